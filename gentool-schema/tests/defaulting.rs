use gentool_core::{EntityKind, Language, NameStyle, segments, styled_name};
use gentool_schema::{
    ConstructorKind, Definition, DocumentWriter, EnumKind, Error, TypeIndex, Visibility,
    coherence_warnings, normalize_class, normalize_enum, unknown_keys,
};
use serde_json::{Value, json};

fn index() -> TypeIndex {
    let mut index = TypeIndex::new();
    index.declare("landmark_type", EntityKind::Enum);
    index.declare("point", EntityKind::Class);
    index.declare("handle", EntityKind::Class);
    index.declare("widget", EntityKind::Class);
    index
}

fn point() -> Value {
    json!({
        "name": "point",
        "properties": [
            { "name": "x", "type": "float" },
            { "name": "y", "type": "float" }
        ]
    })
}

#[test]
fn test_point_scenario() {
    let def = normalize_class(&point(), &index()).unwrap();

    let ctor = &def.parameterless_constructor;
    assert_eq!(ctor.definition.get(), Definition::Default);
    assert!(ctor.definition.is_generated());
    assert!(ctor.noexcept.get());
    let initial: Vec<_> = ctor
        .initialized_properties
        .iter()
        .map(|p| (p.name.as_str(), p.value.value().as_str()))
        .collect();
    assert_eq!(initial, [("x", "0.0f"), ("y", "0.0f")]);

    let equality = &def.equality_operator;
    assert!(equality.defined.get());
    assert!(!equality.compare_pointers.get());
    let compared: Vec<_> = equality
        .compared_properties
        .iter()
        .map(|p| (p.name.as_str(), p.use_getter.get()))
        .collect();
    assert_eq!(compared, [("x", false), ("y", false)]);

    let hash = &def.hash_operator;
    assert!(hash.defined.get());
    assert!(!hash.use_pointer_as_hash.get());
    let hashed: Vec<_> = hash.hashed_properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(hashed, ["x", "y"]);
}

#[test]
fn test_handle_scenario() {
    let def = normalize_class(
        &json!({
            "name": "handle",
            "copyable": false,
            "properties": [{ "name": "id", "type": "uint64" }]
        }),
        &index(),
    )
    .unwrap();

    assert!(def.equality_operator.compare_pointers.get());
    assert!(def.equality_operator.compare_pointers.is_generated());
    assert_eq!(def.copy_constructor.definition.get(), Definition::Deleted);
    assert!(!def.copy_constructor.noexcept.get());
    assert_eq!(def.move_constructor.definition.get(), Definition::Default);
    assert!(def.hash_operator.use_pointer_as_hash.get());
}

#[test]
fn test_static_class_constructor_suppression() {
    let def = normalize_class(
        &json!({
            "name": "sdk_config",
            "static": true,
            "properties": [{ "name": "verbose", "type": "boolean" }]
        }),
        &index(),
    )
    .unwrap();

    for kind in ConstructorKind::ALL {
        assert!(!def.constructor(kind).definition.get().is_available(), "{kind:?}");
    }
    assert_eq!(def.parameterless_constructor.visibility.get(), Visibility::Private);
    assert!(!def.destructor.definition.get().is_available());

    let err = normalize_class(
        &json!({ "name": "sdk_config", "static": true, "copyConstructor": { "definition": "default" } }),
        &index(),
    )
    .unwrap_err();
    assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "copyConstructor.definition"));
}

#[test]
fn test_flag_enum_doubling() {
    let def = normalize_enum(&json!({
        "name": "capability",
        "type": "flag",
        "constants": [{ "name": "read" }, { "name": "write" }, { "name": "execute" }, { "name": "share" }]
    }))
    .unwrap();

    assert_eq!(def.kind.get(), EnumKind::Flag);
    let values: Vec<_> = def.constants.iter().map(|c| c.value.get()).collect();
    assert_eq!(values, [1, 2, 4, 8]);
}

#[test]
fn test_mixed_flag_values_rejected() {
    let err = normalize_enum(&json!({
        "name": "capability",
        "type": "flag",
        "constants": [{ "name": "read", "value": 1 }, { "name": "write" }]
    }))
    .unwrap_err();
    assert!(matches!(*err, Error::FlagEnumValueMixing { ref key, .. } if key == "constants"));
}

#[test]
fn test_duplicate_constant_value() {
    let err = normalize_enum(&json!({
        "name": "landmark_type",
        "constants": [{ "name": "a", "value": 1 }, { "name": "b", "value": 0 }, { "name": "c" }]
    }))
    .unwrap_err();
    assert!(matches!(
        *err,
        Error::DuplicateConstantValue { value: 1, ref first, ref second, .. } if first == "a" && second == "c"
    ));
}

#[test]
fn test_unknown_type_reference() {
    let err = normalize_class(
        &json!({ "name": "scene", "properties": [{ "name": "origin", "type": "CLASS_PTR:vertex" }] }),
        &index(),
    )
    .unwrap_err();
    assert!(matches!(
        *err,
        Error::UnknownTypeReference { ref key, ref reference } if key == "properties[0].type" && reference == "vertex"
    ));
}

#[test]
fn test_wrong_reference_kind() {
    let err = normalize_class(
        &json!({ "name": "scene", "properties": [{ "name": "kind", "type": "CLASS:landmark_type" }] }),
        &index(),
    )
    .unwrap_err();
    assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "properties[0].type"));
}

#[test]
fn test_missing_name() {
    let err = normalize_class(&json!({ "properties": [] }), &index()).unwrap_err();
    assert!(matches!(*err, Error::MissingField { ref key } if key == "name"));
}

#[test]
fn test_shared_pointer_copy_is_deep() {
    let def = normalize_class(
        &json!({
            "name": "widget",
            "properties": [
                { "name": "anchor", "type": "CLASS_PTR:point" },
                { "name": "kind", "type": "ENUM:landmark_type" }
            ]
        }),
        &index(),
    )
    .unwrap();

    let copy = &def.copy_constructor;
    assert_eq!(copy.definition.get(), Definition::Defined);
    assert!(copy.initialized_properties[0].value.contains("std::make_shared"));
    assert_eq!(copy.initialized_properties[1].value.value(), "@");
    assert!(!copy.noexcept.get());

    let anchor = &def.properties[0];
    assert!(!anchor.getter.noexcept.get());
    assert!(def.properties[1].setter.noexcept.get());
}

#[test]
fn test_normalization_is_idempotent() {
    let writer = DocumentWriter::new();
    let documents = [
        point(),
        json!({
            "name": "widget",
            "final": true,
            "aliases": ["control"],
            "properties": [
                { "name": "label", "type": "string", "defaultValue": "\"untitled\"" },
                { "name": "anchor", "type": "CLASS_PTR_MIX:point" },
                { "name": "tags", "type": "ARRAY:string" },
                { "name": "kind", "type": "ENUM:landmark_type", "getterVisibility": "protected" }
            ],
            "destructor": { "code": ["release();"] }
        }),
        json!({ "name": "handle", "copyable": false }),
        json!({ "name": "sdk_config", "static": true, "properties": [{ "name": "level", "type": "int32" }] }),
    ];

    for document in documents {
        let first = writer.class_document(&normalize_class(&document, &index()).unwrap());
        let second = writer.class_document(&normalize_class(&first, &index()).unwrap());
        assert_eq!(first, second, "{}", document["name"]);
        assert!(unknown_keys(&document, &first).is_empty());
    }

    let flags = json!({ "name": "capability", "type": "flag", "constants": [{ "name": "read" }, { "name": "write" }] });
    let first = writer.enum_document(&normalize_enum(&flags).unwrap());
    let second = writer.enum_document(&normalize_enum(&first).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_round_trip_naming() {
    for canonical in ["point", "landmark_observation", "vector3f", "qr_code_detection"] {
        for style in NameStyle::ALL {
            let styled = styled_name(canonical, style).unwrap();
            let recovered: Vec<String> = segments(&styled, style)
                .into_iter()
                .map(|segment| segment.to_lowercase())
                .collect();
            assert_eq!(recovered.join("_"), canonical, "{style}");
        }
    }
}

#[test]
fn test_hash_follows_equality_list() {
    let def = normalize_class(
        &json!({
            "name": "point",
            "properties": [
                { "name": "x", "type": "float" },
                { "name": "y", "type": "float" },
                { "name": "cached", "type": "double", "partOfIdentity": false }
            ],
            "equalityOperator": { "comparedProperties": [{ "name": "y" }, { "name": "x" }] }
        }),
        &index(),
    )
    .unwrap();

    let compared: Vec<_> = def.equality_operator.compared_properties.iter().map(|p| &p.name).collect();
    let hashed: Vec<_> = def.hash_operator.hashed_properties.iter().map(|p| &p.name).collect();
    assert_eq!(compared, hashed);
    assert_eq!(hashed, ["y", "x"]);
    assert!(coherence_warnings(&def).is_empty());
}

#[test]
fn test_language_names() {
    let def = normalize_class(&point(), &index()).unwrap();
    assert_eq!(def.name.lang(Language::Cxx), "Point");
    assert_eq!(def.name.lang(Language::C), "psm_point_t");
    let x = &def.properties[0];
    assert_eq!(x.name.lang(Language::Cxx), "m_x");
    assert_eq!(x.getter.name.lang(Language::Cxx), "getX");
    assert_eq!(x.setter.name.lang(Language::C), "set_x");
}

#[test]
fn test_shared_pointer_identity_follows_pointee() {
    let def = normalize_class(
        &json!({
            "name": "widget",
            "properties": [
                { "name": "anchor", "type": "CLASS_PTR:point" },
                { "name": "corners", "type": "ARRAY_PTR:point" },
                { "name": "label", "type": "string" }
            ]
        }),
        &index(),
    )
    .unwrap();

    let compared: Vec<_> = def
        .equality_operator
        .compared_properties
        .iter()
        .map(|p| (p.name.as_str(), p.dereference.get()))
        .collect();
    assert_eq!(compared, [("anchor", true), ("corners", true), ("label", false)]);
    let hashed: Vec<_> = def
        .hash_operator
        .hashed_properties
        .iter()
        .map(|p| (p.name.as_str(), p.dereference.get()))
        .collect();
    assert_eq!(hashed, compared);

    let writer = DocumentWriter::new();
    let document = writer.class_document(&def);
    assert_eq!(
        document["equalityOperator"]["comparedProperties"][0]["dereference"],
        Value::Bool(true)
    );
    let again = writer.class_document(&normalize_class(&document, &index()).unwrap());
    assert_eq!(again, document);
}

#[test]
fn test_dereference_requires_shared_pointers() {
    let err = normalize_class(
        &json!({
            "name": "point",
            "properties": [{ "name": "x", "type": "float" }],
            "equalityOperator": { "comparedProperties": [{ "name": "x", "dereference": true }] }
        }),
        &index(),
    )
    .unwrap_err();
    assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key.ends_with("dereference")));
}
