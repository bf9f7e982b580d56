//! Emission contracts of the C++ backend.

use gentool_codegen::{Backend, Emitted};
use gentool_codegen_cxx::CxxBackend;
use gentool_core::EntityKind;
use gentool_schema::{Registry, TypeIndex, declared_name, normalize_class, normalize_enum};
use serde_json::{Value, json};

fn registry(enums: &[Value], classes: &[Value]) -> Registry {
    let mut index = TypeIndex::new();
    for doc in enums {
        index.declare(declared_name(doc).unwrap(), EntityKind::Enum);
    }
    for doc in classes {
        index.declare(declared_name(doc).unwrap(), EntityKind::Class);
    }

    let mut registry = Registry::new();
    for doc in enums {
        registry.insert_enum(normalize_enum(doc).unwrap());
    }
    for doc in classes {
        registry.insert_class(normalize_class(doc, &index).unwrap());
    }
    registry
}

fn emit_class(registry: &Registry, name: &str) -> Emitted {
    CxxBackend::new()
        .emit_class(registry.class_def(name).unwrap(), registry)
        .unwrap()
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
fn test_point_header_layout() {
    let registry = registry(&[], &[point()]);
    let header = emit_class(&registry, "point").header;

    assert!(header.starts_with(
        "/* This code is automatically generated from point.json interface. Do not modify it manually as it will be overwritten! */\n\n#ifndef __POSEMESH_POINT_HPP__\n#define __POSEMESH_POINT_HPP__\n\n#include <functional>\n#include <ostream>\n#include <string>\n\n#include \"API.hpp\"\n\nnamespace psm {\n\nclass Point {\npublic:\n"
    ));
    assert!(header.contains(
        "    PSM_API Point() noexcept;\n    PSM_API Point(const Point& point) noexcept;\n    PSM_API Point(Point&& point) noexcept;\n    PSM_API ~Point();\n\n"
    ));
    assert!(header.contains("    Point& PSM_API operator=(const Point& point) noexcept;\n"));
    assert!(header.contains("    bool PSM_API operator==(const Point& point) const noexcept;\n"));
    assert!(header.contains("    explicit PSM_API operator std::string() const;\n"));
    assert!(header.contains(
        "    float PSM_API getX() const noexcept;\n    void PSM_API setX(float x) noexcept;\n"
    ));
    assert!(header.contains(
        "private:\n    float m_x {0.0f};\n    float m_y {0.0f};\n\n    friend struct std::hash<Point>;\n};\n"
    ));
    assert!(header.contains("PSM_API std::ostream& operator<<(std::ostream& stream, const Point& point);\n"));
    assert!(header.contains(
        "namespace std {\n\ntemplate <>\nstruct hash<psm::Point> {\n    std::size_t PSM_API operator()(const psm::Point& point) const noexcept;\n};\n\n}\n"
    ));
    assert!(header.ends_with("#endif // __POSEMESH_POINT_HPP__\n"));
}

#[test]
fn test_point_source_definitions() {
    let registry = registry(&[], &[point()]);
    let source = emit_class(&registry, "point").source.unwrap();

    assert!(source.contains("#include <Posemesh/Point.hpp>\n"));
    assert!(source.contains("Point::Point() noexcept = default;\n"));
    assert!(source.contains("Point::Point(const Point& point) noexcept = default;\n"));
    assert!(source.contains("Point::~Point() = default;\n"));
    assert!(source.contains("Point& Point::operator=(Point&& point) noexcept = default;\n"));
    assert!(source.contains(
        "bool Point::operator==(const Point& point) const noexcept\n{\n    if (!(m_x == point.m_x)) {\n        return false;\n    }\n    if (!(m_y == point.m_y)) {\n        return false;\n    }\n    return true;\n}\n"
    ));
    assert!(source.contains("    return !(*this == point);\n"));
    assert!(source.contains("float Point::getX() const noexcept\n{\n    return m_x;\n}\n"));
    assert!(source.contains("void Point::setY(float y) noexcept\n{\n    m_y = y;\n}\n"));
    assert!(source.contains("    stream << \" x: \" << m_x;\n    stream << \", y: \" << m_y;\n"));
}

#[test]
fn test_hash_follows_property_order() {
    let registry = registry(&[], &[point()]);
    let source = emit_class(&registry, "point").source.unwrap();

    assert!(source.contains(
        "namespace std {\n\nstd::size_t hash<psm::Point>::operator()(const psm::Point& point) const noexcept\n{\n    std::size_t result = 0;\n    result ^= (hash<float> {}(point.m_x)) + 0x9e3779b9 + (result << 6) + (result >> 2);\n    result ^= (hash<float> {}(point.m_y)) + 0x9e3779b9 + (result << 6) + (result >> 2);\n    return result;\n}\n\n}\n"
    ));
}

#[test]
fn test_non_copyable_class_compares_pointers() {
    let registry = registry(&[], &[json!({ "name": "handle", "copyable": false })]);
    let emitted = emit_class(&registry, "handle");

    assert!(emitted.header.contains("    Handle(const Handle& handle) = delete;\n"));
    assert!(emitted.header.contains("    Handle& operator=(const Handle& handle) = delete;\n"));
    assert!(emitted.header.contains("    PSM_API Handle(Handle&& handle) noexcept;\n"));

    let source = emitted.source.unwrap();
    assert!(!source.contains("Handle::Handle(const Handle& handle)"));
    assert!(source.contains("    return this == &handle;\n"));
    assert!(source.contains("    return hash<const psm::Handle*> {}(&handle);\n"));
}

#[test]
fn test_declared_defaults_define_the_constructor() {
    let registry = registry(
        &[],
        &[json!({
            "name": "gauge",
            "properties": [
                { "name": "level", "type": "float", "defaultValue": "1.0f" },
                { "name": "count", "type": "int32" }
            ]
        })],
    );
    let emitted = emit_class(&registry, "gauge");

    assert!(emitted.header.contains("#include <cstdint>\n"));
    assert!(emitted.header.contains("    std::int32_t PSM_API getCount() const noexcept;\n"));
    assert!(emitted.header.contains("    std::int32_t m_count {0};\n"));

    let source = emitted.source.unwrap();
    assert!(source.contains("Gauge::Gauge() noexcept\n    : m_level(1.0f)\n    , m_count(0)\n{\n}\n"));
    assert!(source.contains("Gauge::Gauge(const Gauge& gauge) noexcept = default;\n"));
}

#[test]
fn test_shared_pointer_members() {
    let registry = registry(
        &[],
        &[
            json!({ "name": "vector3", "properties": [{ "name": "x", "type": "float" }] }),
            json!({
                "name": "landmark",
                "properties": [
                    { "name": "anchor", "type": "CLASS_PTR:vector3" },
                    { "name": "label", "type": "string" }
                ]
            }),
        ],
    );
    let emitted = emit_class(&registry, "landmark");
    let header = &emitted.header;

    assert!(header.contains("#include <functional>\n#include <memory>\n#include <ostream>\n#include <string>\n\n#include \"API.hpp\"\n#include \"Vector3.hpp\"\n"));
    assert!(header.contains("    std::shared_ptr<Vector3> PSM_API getAnchor() const;\n"));
    assert!(header.contains("    void PSM_API setAnchor(std::shared_ptr<Vector3> anchor);\n"));
    assert!(header.contains("    std::shared_ptr<Vector3> m_anchor;\n    std::string m_label;\n"));

    let source = emitted.source.unwrap();
    assert!(source.contains("#include <Posemesh/Landmark.hpp>\n#include <cassert>\n"));
    assert!(source.contains(
        "void Landmark::setAnchor(std::shared_ptr<Vector3> anchor)\n{\n    if (!anchor) {\n        assert(!\"Landmark::setAnchor(): anchor is null\");\n        return;\n    }\n    m_anchor = std::move(anchor);\n}\n"
    ));
    assert!(source.contains(
        "Landmark::Landmark(const Landmark& landmark)\n    : m_anchor(landmark.m_anchor ? std::make_shared<std::decay_t<decltype(*landmark.m_anchor)>>(*landmark.m_anchor) : nullptr)\n    , m_label(landmark.m_label)\n{\n}\n"
    ));
    assert!(source.contains(
        "Landmark& Landmark::operator=(const Landmark& landmark)\n{\n    if (&landmark == this) {\n        return *this;\n    }\n"
    ));
    assert!(source.contains("    m_label = landmark.m_label;\n    return *this;\n}\n"));
}

#[test]
fn test_copied_pointer_members_stay_equal() {
    let registry = registry(
        &[],
        &[
            json!({ "name": "vector3", "properties": [{ "name": "x", "type": "float" }] }),
            json!({
                "name": "landmark",
                "properties": [
                    { "name": "anchor", "type": "CLASS_PTR:vector3" },
                    { "name": "corners", "type": "ARRAY_PTR:vector3" }
                ]
            }),
        ],
    );
    let source = emit_class(&registry, "landmark").source.unwrap();

    assert!(source.contains("#include <algorithm>\n"));
    assert!(source.contains(
        "    if (!([](const auto& l, const auto& r) { return l == r || (l && r && *l == *r); }(m_anchor, landmark.m_anchor))) {\n        return false;\n    }\n"
    ));
    assert!(source.contains(
        "    if (!([](const auto& l, const auto& r) { return std::equal(l.begin(), l.end(), r.begin(), r.end(), [](const auto& a, const auto& b) { return a == b || (a && b && *a == *b); }); }(m_corners, landmark.m_corners))) {\n"
    ));
    assert!(!source.contains("m_anchor == landmark.m_anchor)"));

    assert!(source.contains(
        "    result ^= ([](const auto& pointer) { return pointer ? hash<std::decay_t<decltype(*pointer)>> {}(*pointer) : 0; }(landmark.m_anchor)) + 0x9e3779b9 + (result << 6) + (result >> 2);\n"
    ));
    assert!(source.contains(
        "for (const auto& element : landmark.m_corners) { h ^= (element ? hash<std::decay_t<decltype(*element)>> {}(*element) : 0) + 0x9e3779b9 + (h << 6) + (h >> 2); }"
    ));
    assert!(!source.contains("hash<std::shared_ptr<"));
}

#[test]
fn test_static_class() {
    let registry = registry(
        &[],
        &[json!({
            "name": "config",
            "static": true,
            "properties": [{ "name": "verbose", "type": "boolean", "defaultValue": "true" }]
        })],
    );
    let emitted = emit_class(&registry, "config");
    let header = &emitted.header;

    assert!(header.contains("class Config final {\npublic:\n    static bool PSM_API getVerbose() noexcept;\n"));
    assert!(header.contains("private:\n    Config() = delete;\n\n    static bool m_verbose;\n};\n"));
    assert!(!header.contains("namespace std"));

    let source = emitted.source.unwrap();
    assert!(source.contains("bool Config::m_verbose {true};\n"));
    assert!(source.contains("bool Config::getVerbose() noexcept\n{\n    return m_verbose;\n}\n"));
}

#[test]
fn test_enum_header() {
    let registry = registry(
        &[json!({
            "name": "landmark_type",
            "aliases": ["marker_type"],
            "constants": [{ "name": "unknown" }, { "name": "qr_code" }]
        })],
        &[],
    );
    let emitted = CxxBackend::new()
        .emit_enum(registry.enum_def("landmark_type").unwrap(), &registry)
        .unwrap();
    assert_eq!(emitted.source, None);
    insta::assert_snapshot!(emitted.header, @r"
    /* This code is automatically generated from landmark_type.json enum. Do not modify it manually as it will be overwritten! */

    #ifndef __POSEMESH_LANDMARK_TYPE_HPP__
    #define __POSEMESH_LANDMARK_TYPE_HPP__

    #include <cstdint>

    namespace psm {

    enum class LandmarkType : std::int32_t {
        Unknown = 0,
        QrCode = 1
    };
    using MarkerType = LandmarkType;

    }

    #endif // __POSEMESH_LANDMARK_TYPE_HPP__
    ");
}

#[test]
fn test_output_paths() {
    let registry = registry(&[], &[point()]);
    let entity = registry.get("point").unwrap();
    let files = CxxBackend::new().files(entity, &registry).unwrap();
    let paths: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();
    assert_eq!(
        paths,
        [
            std::path::PathBuf::from("include/Posemesh/Point.hpp"),
            std::path::PathBuf::from("src/Point.gen.cpp"),
        ]
    );
}
