//! The flat C function set exported for one class.
//!
//! Declarations in the header and definitions in the source are both
//! rendered from the same [`Surface`], so the two never disagree.

use std::collections::BTreeSet;

use eyre::Result;
use gentool_codegen::{
    TypeSpeller, UseSite,
    language::{CXX_NAMESPACE, c_enum_type, c_ref_type, c_scalar, c_stem, cxx_scalar},
    snippets::{null_assert, null_guard},
};
use gentool_core::{Element, Language, NameStyle, Scalar, TypeTag};
use gentool_schema::{ClassDef, Definition, MethodMode, Name, Property, Registry, Visibility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

impl Param {
    fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// One exported C function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CFunction {
    pub name: String,
    pub returns: String,
    pub params: Vec<Param>,
    pub body: Vec<String>,
}

impl CFunction {
    fn new(name: String, returns: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name,
            returns: returns.into(),
            params,
            body: Vec::new(),
        }
    }

    fn body<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    fn param_list(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated parameter names, as forwarded by alias macros.
    pub fn arg_names(&self) -> String {
        self.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// `ret PSM_API name(params);`
    pub fn declaration(&self) -> String {
        format!("{} PSM_API {}({});", self.returns, self.name, self.param_list())
    }

    /// Definition signature, without the export macro.
    pub fn signature(&self) -> String {
        format!("{} {}({})", self.returns, self.name, self.param_list())
    }
}

/// Functions grouped the way they are laid out in the header.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub constructors: Vec<CFunction>,
    pub operators: Vec<CFunction>,
    pub methods: Vec<CFunction>,
    pub static_functions: Vec<CFunction>,
    pub references: Vec<CFunction>,
    /// Entities named by property types, by canonical name.
    pub referenced: BTreeSet<String>,
    pub uses_strings: bool,
}

impl Surface {
    pub fn groups(&self) -> impl Iterator<Item = &Vec<CFunction>> {
        [
            &self.constructors,
            &self.operators,
            &self.methods,
            &self.static_functions,
            &self.references,
        ]
        .into_iter()
        .filter(|group| !group.is_empty())
    }

    pub fn functions(&self) -> impl Iterator<Item = &CFunction> {
        self.groups().flatten()
    }

    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }

    pub fn build(def: &ClassDef, registry: &Registry) -> Result<Self> {
        let builder = SurfaceBuilder::new(def, registry);
        builder.build()
    }
}

struct SurfaceBuilder<'a> {
    def: &'a ClassDef,
    speller: TypeSpeller<'a>,
    stem: &'a str,
    handle: &'a str,
    cxx: String,
    arg: &'a str,
}

impl<'a> SurfaceBuilder<'a> {
    fn new(def: &'a ClassDef, registry: &'a Registry) -> Self {
        Self {
            def,
            speller: TypeSpeller::new(registry).qualified(true),
            stem: c_stem(&def.name),
            handle: def.name.lang(Language::C),
            cxx: format!("{CXX_NAMESPACE}::{}", def.name.lang(Language::Cxx)),
            arg: def.name.style(NameStyle::LowerCase),
        }
    }

    fn function_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.stem, suffix)
    }

    fn instance(&self, is_const: bool) -> Param {
        let ty = if is_const {
            format!("const {}*", self.handle)
        } else {
            format!("{}*", self.handle)
        };
        Param::new(ty, self.arg)
    }

    fn build(self) -> Result<Surface> {
        let mut surface = Surface::default();
        let instantiable = !self.def.is_static.get();

        if instantiable {
            surface.constructors = self.constructors();
            surface.operators = self.operators();
        }

        for property in &self.def.properties {
            if let Some(name) = property.type_tag.referenced_name() {
                if name != self.def.name.canonical() {
                    surface.referenced.insert(name.to_string());
                }
            }
            surface.uses_strings |= property.type_tag.is_string()
                || matches!(
                    property.type_tag,
                    TypeTag::Array(Element::String) | TypeTag::ArrayRef(Element::String) | TypeTag::ArrayMix(Element::String)
                );

            let group = if property.is_static.get() {
                &mut surface.static_functions
            } else {
                &mut surface.methods
            };
            if property.getter.is_public() {
                group.extend(self.getter(property)?);
            }
            if property.setter.is_public() {
                group.push(self.setter(property)?);
            }
        }

        if instantiable && surface.constructors.iter().any(|f| f.name == self.function_name("destroy")) {
            surface.references = self.references();
        }
        surface.uses_strings |= self.def.to_string_operator.defined.get();
        Ok(surface)
    }

    fn is_abstract(&self) -> bool {
        self.def.properties.iter().any(|p| {
            (p.getter.present.get() && p.getter.mode.get() == MethodMode::PureVirtual)
                || (p.setter.present.get() && p.setter.mode.get() == MethodMode::PureVirtual)
        })
    }

    fn constructors(&self) -> Vec<CFunction> {
        let mut functions = Vec::new();
        let exported = |definition: Definition, visibility: Visibility| {
            definition.is_available() && visibility == Visibility::Public
        };
        let handle_ptr = format!("{}*", self.handle);

        if !self.is_abstract() {
            let ctor = &self.def.parameterless_constructor;
            if exported(ctor.definition.get(), ctor.visibility.get()) {
                functions.push(
                    CFunction::new(self.function_name("create"), handle_ptr.as_str(), Vec::new())
                        .body([format!("return new (std::nothrow) {};", self.cxx)]),
                );
            }

            let copy = &self.def.copy_constructor;
            if exported(copy.definition.get(), copy.visibility.get()) {
                let name = self.function_name("duplicate");
                let source = copy
                    .assignment
                    .as_ref()
                    .map_or(self.arg, |a| a.main_arg_name.lang(Language::C));
                let mut body = null_guard(&name, source, Some("nullptr"));
                body.push(format!("return new (std::nothrow) {}(*{source});", self.cxx));
                let param = Param::new(format!("const {}*", self.handle), source);
                functions.push(CFunction::new(name, handle_ptr.as_str(), vec![param]).body(body));
            }
        }

        let dtor = &self.def.destructor;
        if exported(dtor.definition.get(), dtor.visibility.get()) {
            functions.push(
                CFunction::new(self.function_name("destroy"), "void", vec![self.instance(false)])
                    .body([format!("delete {};", self.arg)]),
            );
        }
        functions
    }

    fn operators(&self) -> Vec<CFunction> {
        let mut functions = Vec::new();

        if self.def.equality_operator.defined.get() {
            let name = self.function_name("equals");
            let other = format!("other_{}", self.arg);
            let mut body = null_guard(&name, self.arg, Some("0"));
            body.extend(null_guard(&name, &other, Some("0")));
            body.push(format!(
                "return static_cast<uint8_t>({}->operator==(*{}));",
                self.arg, other
            ));
            functions.push(
                CFunction::new(
                    name,
                    "uint8_t",
                    vec![self.instance(true), Param::new(format!("const {}*", self.handle), other.as_str())],
                )
                .body(body),
            );
        }

        if self.def.hash_operator.defined.get() {
            let name = self.function_name("hash");
            let mut body = null_guard(&name, self.arg, Some("0"));
            body.push(format!("return std::hash<{}> {{}}(*{});", self.cxx, self.arg));
            functions.push(CFunction::new(name, "size_t", vec![self.instance(true)]).body(body));
        }

        if self.def.to_string_operator.defined.get() {
            let name = self.function_name("to_string");
            let mut body = null_guard(&name, self.arg, Some("nullptr"));
            body.push(format!("const auto str = static_cast<std::string>(*{});", self.arg));
            body.extend(copy_string("str"));
            functions.push(CFunction::new(name, "const char*", vec![self.instance(true)]).body(body));
            functions.push(
                CFunction::new(
                    self.function_name("to_string_free"),
                    "void",
                    vec![Param::new("const char*", "str")],
                )
                .body(["delete[] const_cast<char*>(str);"]),
            );
        }
        functions
    }

    fn references(&self) -> Vec<CFunction> {
        let ref_type = c_ref_type(&self.def.name);
        let ref_arg = format!("{}_ref", self.arg);
        let make = self.function_name("ref_make");
        let clone = self.function_name("ref_clone");
        let get = self.function_name("ref_get");

        let mut make_body = null_guard(&make, self.arg, Some("nullptr"));
        make_body.push(format!(
            "return new (std::nothrow) {ref_type}({}, &{});",
            self.arg,
            self.function_name("destroy")
        ));

        let mut clone_body = null_guard(&clone, &ref_arg, Some("nullptr"));
        clone_body.push(format!("return new (std::nothrow) {ref_type}(*{ref_arg});"));

        let mut get_body = null_guard(&get, &ref_arg, Some("nullptr"));
        get_body.push(format!("return {ref_arg}->get();"));

        let const_ref = Param::new(format!("const {ref_type}*"), ref_arg.as_str());
        vec![
            CFunction::new(make, format!("{ref_type}*"), vec![self.instance(false)]).body(make_body),
            CFunction::new(clone, format!("{ref_type}*"), vec![const_ref.clone()]).body(clone_body),
            CFunction::new(get, format!("{}*", self.handle), vec![const_ref]).body(get_body),
            CFunction::new(
                self.function_name("ref_delete"),
                "void",
                vec![Param::new(format!("{ref_type}*"), ref_arg.as_str())],
            )
            .body([format!("delete {ref_arg};")]),
        ]
    }

    fn entity(&self, tag: &TypeTag, name: &str) -> Result<&'a Name> {
        Ok(self.speller.entity(tag, name)?)
    }

    fn cxx_entity(&self, tag: &TypeTag, name: &str) -> Result<String> {
        Ok(format!("{CXX_NAMESPACE}::{}", self.entity(tag, name)?.lang(Language::Cxx)))
    }

    /// Receiver of an accessor call, and the leading parameter if any.
    fn receiver(&self, property: &Property, is_const: bool) -> (String, Option<Param>) {
        if property.is_static.get() {
            (format!("{}::", self.cxx), None)
        } else {
            (format!("{}->", self.arg), Some(self.instance(is_const)))
        }
    }

    fn getter(&self, property: &Property) -> Result<Vec<CFunction>> {
        let tag = &property.type_tag;
        let name = self.function_name(property.getter.name.lang(Language::C));
        let free_name = format!("{name}_free");
        let (receiver, instance) = self.receiver(property, property.getter.is_const.get());
        let call = format!("{receiver}{}()", property.getter.name.lang(Language::Cxx));
        let p = property.name.lang(Language::C);
        let value = if p == self.arg { format!("{p}_value") } else { p.to_string() };
        let returns = self.speller.spell(tag, Language::C, UseSite::Getter)?;

        let mut params: Vec<Param> = instance.into_iter().collect();
        let guard = |fallback: &str| -> Vec<String> {
            if property.is_static.get() {
                Vec::new()
            } else {
                null_guard(&name, self.arg, Some(fallback))
            }
        };

        let mut free = None;
        let body = match tag {
            TypeTag::Scalar(scalar) => {
                let mut body = guard(c_zero(*scalar));
                if *scalar == Scalar::Boolean {
                    body.push(format!("return static_cast<uint8_t>({call});"));
                } else {
                    body.push(format!("return {call};"));
                }
                body
            }
            TypeTag::Enum(_) => {
                let mut body = guard(&format!("static_cast<{returns}>(0)"));
                body.push(format!("return static_cast<{returns}>({call});"));
                body
            }
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => {
                let mut body = guard("nullptr");
                body.push(format!("const auto {value} = {call};"));
                body.extend(copy_string(&value));
                free = Some((
                    Param::new("const char*", p),
                    vec![format!("delete[] const_cast<char*>({p});")],
                ));
                body
            }
            TypeTag::Class(target) | TypeTag::ClassRef(target) | TypeTag::ClassMix(target) => {
                let mut body = guard("nullptr");
                body.push(format!(
                    "return new (std::nothrow) {}({call});",
                    self.cxx_entity(tag, target)?
                ));
                free = Some((Param::new(returns.as_str(), p), vec![format!("delete {p};")]));
                body
            }
            TypeTag::ClassPtr(_) | TypeTag::ClassPtrRef(_) | TypeTag::ClassPtrMix(_) => {
                let ref_type = self.speller.spell(tag, Language::C, UseSite::Any)?;
                let mut body = guard("nullptr");
                body.push(format!("auto {value} = {call};"));
                body.extend([
                    format!("if (!{value}) {{"),
                    "    return nullptr;".to_string(),
                    "}".to_string(),
                    format!("return new (std::nothrow) {ref_type}(std::move({value}));"),
                ]);
                free = Some((Param::new(returns.as_str(), p), vec![format!("delete {p};")]));
                body
            }
            TypeTag::Array(_)
            | TypeTag::ArrayRef(_)
            | TypeTag::ArrayMix(_)
            | TypeTag::ArrayPtr(_)
            | TypeTag::ArrayPtrRef(_)
            | TypeTag::ArrayPtrMix(_) => {
                let count = format!("out_{p}_count");
                params.push(Param::new("uint32_t*", count.as_str()));
                let mut body = guard("nullptr");
                body.extend(null_guard(&name, &count, Some("nullptr")));
                body.push(format!("const auto {value} = {call};"));
                body.push(format!("*{count} = static_cast<uint32_t>({value}.size());"));

                let shape = self.array_shape(tag)?;
                match shape {
                    ArrayShape::Values { element } => {
                        body.extend([
                            format!("auto* getter_result = new (std::nothrow) {element}[{value}.size()];"),
                            "if (!getter_result) {".to_string(),
                            format!("    *{count} = 0;"),
                            "    return nullptr;".to_string(),
                            "}".to_string(),
                            format!("for (std::size_t i = 0; i < {value}.size(); ++i) {{"),
                            format!("    getter_result[i] = static_cast<{element}>({value}[i]);"),
                            "}".to_string(),
                            "return getter_result;".to_string(),
                        ]);
                        free = Some((
                            Param::new(returns.as_str(), p),
                            vec![format!("delete[] const_cast<{element}*>({p});")],
                        ));
                    }
                    ArrayShape::Pointers { element, allocate, fill, release } => {
                        body.extend([
                            format!("auto* getter_result = new (std::nothrow) {element}[{value}.size() + 1] {{}};"),
                            "if (!getter_result) {".to_string(),
                            format!("    *{count} = 0;"),
                            "    return nullptr;".to_string(),
                            "}".to_string(),
                            format!("for (std::size_t i = 0; i < {value}.size(); ++i) {{"),
                            format!("    auto* element = {};", allocate.replace("{}", &format!("{value}[i]"))),
                            "    if (!element) {".to_string(),
                            format!("        {free_name}(getter_result);"),
                            format!("        *{count} = 0;"),
                            "        return nullptr;".to_string(),
                            "    }".to_string(),
                        ]);
                        if let Some(fill) = fill {
                            body.push(format!("    {}", fill.replace("{}", &format!("{value}[i]"))));
                        }
                        body.extend([
                            "    getter_result[i] = element;".to_string(),
                            "}".to_string(),
                            "return getter_result;".to_string(),
                        ]);
                        free = Some((
                            Param::new(returns.as_str(), p),
                            vec![
                                format!("if (!{p}) {{"),
                                "    return;".to_string(),
                                "}".to_string(),
                                format!("for (auto* element = {p}; *element; ++element) {{"),
                                format!("    {release} *element;"),
                                "}".to_string(),
                                format!("delete[] {p};"),
                            ],
                        ));
                    }
                }
                body
            }
        };

        let mut functions = vec![CFunction::new(name, returns.as_str(), params).body(body)];
        if let Some((param, body)) = free {
            functions.push(CFunction::new(free_name, "void", vec![param]).body(body));
        }
        Ok(functions)
    }

    fn array_shape(&self, tag: &TypeTag) -> Result<ArrayShape> {
        Ok(match tag {
            TypeTag::Array(element) | TypeTag::ArrayRef(element) | TypeTag::ArrayMix(element) => match element {
                Element::Scalar(scalar) => ArrayShape::Values {
                    element: c_scalar(*scalar).to_string(),
                },
                Element::Enum(name) => ArrayShape::Values {
                    element: c_enum_type(self.entity(tag, name)?),
                },
                Element::String => ArrayShape::Pointers {
                    element: "const char*".to_string(),
                    allocate: "new (std::nothrow) char[{}.size() + 1]".to_string(),
                    fill: Some("std::memcpy(element, {}.c_str(), {}.size() + 1);".to_string()),
                    release: "delete[]",
                },
                Element::Class(name) => ArrayShape::Pointers {
                    element: format!("{}*", self.entity(tag, name)?.lang(Language::C)),
                    allocate: format!("new (std::nothrow) {}({{}})", self.cxx_entity(tag, name)?),
                    fill: None,
                    release: "delete",
                },
            },
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                let ref_type = c_ref_type(self.entity(tag, name)?);
                ArrayShape::Pointers {
                    element: format!("{ref_type}*"),
                    allocate: format!("new (std::nothrow) {ref_type}({{}})"),
                    fill: None,
                    release: "delete",
                }
            }
            other => eyre::bail!("'{other}' is not an array type"),
        })
    }

    fn setter(&self, property: &Property) -> Result<CFunction> {
        let tag = &property.type_tag;
        let name = self.function_name(property.setter.name.lang(Language::C));
        let (receiver, instance) = self.receiver(property, property.setter.is_const.get());
        let method = format!("{receiver}{}", property.setter.name.lang(Language::Cxx));
        let a = property.setter_arg_name.lang(Language::C);
        let ty = self.speller.spell(tag, Language::C, UseSite::Setter)?;

        let mut params: Vec<Param> = instance.into_iter().collect();
        params.push(Param::new(ty.as_str(), a));

        let mut body = if property.is_static.get() {
            Vec::new()
        } else {
            null_guard(&name, self.arg, None)
        };

        match tag {
            TypeTag::Scalar(Scalar::Boolean) => body.push(format!("{method}(static_cast<bool>({a}));")),
            TypeTag::Scalar(_) => body.push(format!("{method}({a});")),
            TypeTag::Enum(target) => {
                body.push(format!("{method}(static_cast<{}>({a}));", self.cxx_entity(tag, target)?))
            }
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => {
                body.push(format!("{method}({a} ? std::string {{ {a} }} : std::string {{}});"))
            }
            TypeTag::Class(_)
            | TypeTag::ClassRef(_)
            | TypeTag::ClassMix(_)
            | TypeTag::ClassPtr(_)
            | TypeTag::ClassPtrRef(_)
            | TypeTag::ClassPtrMix(_) => {
                body.extend(null_guard(&name, a, None));
                body.push(format!("{method}(*{a});"));
            }
            TypeTag::Array(_)
            | TypeTag::ArrayRef(_)
            | TypeTag::ArrayMix(_)
            | TypeTag::ArrayPtr(_)
            | TypeTag::ArrayPtrRef(_)
            | TypeTag::ArrayPtrMix(_) => {
                let count = format!("{a}_count");
                params.push(Param::new("uint32_t", count.as_str()));
                let vector = format!("{a}_vector");
                let vector_type = self.speller.spell(tag, Language::Cxx, UseSite::Any)?;

                body.extend([
                    format!("if (!{a} && {count} > 0) {{"),
                    format!("    {}", null_assert(&name, a)),
                    "    return;".to_string(),
                    "}".to_string(),
                    format!("{vector_type} {vector};"),
                    format!("{vector}.reserve({count});"),
                    format!("for (uint32_t i = 0; i < {count}; ++i) {{"),
                ]);
                let element = format!("{a}[i]");
                let push: Vec<String> = match tag {
                    TypeTag::Array(e) | TypeTag::ArrayRef(e) | TypeTag::ArrayMix(e) => match e {
                        Element::Scalar(scalar) => vec![format!(
                            "{vector}.push_back(static_cast<{}>({element}));",
                            cxx_scalar(*scalar)
                        )],
                        Element::Enum(target) => vec![format!(
                            "{vector}.push_back(static_cast<{}>({element}));",
                            self.cxx_entity(tag, target)?
                        )],
                        Element::String => vec![format!("{vector}.emplace_back({element} ? {element} : \"\");")],
                        Element::Class(_) => {
                            let mut lines = null_guard(&name, &element, None);
                            lines.push(format!("{vector}.push_back(*{element});"));
                            lines
                        }
                    },
                    _ => {
                        let mut lines = null_guard(&name, &element, None);
                        lines.push(format!("{vector}.push_back(*{element});"));
                        lines
                    }
                };
                body.extend(push.into_iter().map(|line| format!("    {line}")));
                body.push("}".to_string());
                body.push(format!("{method}(std::move({vector}));"));
            }
        }

        Ok(CFunction::new(name, "void", params).body(body))
    }
}

enum ArrayShape {
    /// Plain element buffer, sized by the out count.
    Values { element: String },
    /// Null-terminated buffer of owned element pointers. `{}` in
    /// `allocate` and `fill` stands for the source element.
    Pointers {
        element: String,
        allocate: String,
        fill: Option<String>,
        release: &'static str,
    },
}

fn c_zero(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Float => "0.0f",
        Scalar::Double => "0.0",
        _ => "0",
    }
}

/// Copy `source` (a `std::string`) into a new `getter_result` buffer and
/// return it.
fn copy_string(source: &str) -> Vec<String> {
    vec![
        format!("auto* getter_result = new (std::nothrow) char[{source}.size() + 1];"),
        "if (!getter_result) {".to_string(),
        "    return nullptr;".to_string(),
        "}".to_string(),
        format!("std::memcpy(getter_result, {source}.c_str(), {source}.size() + 1);"),
        "return getter_result;".to_string(),
    ]
}
