//! Member layout of a generated C++ class.
//!
//! [`ClassLayout::build`] walks a normalized class once and records every
//! header declaration together with the matching source definition.

use eyre::Result;
use gentool_codegen::{
    CodeBuilder, IncludeCollector, TypeSpeller, UseSite,
    language::CXX_NAMESPACE,
    snippets::{
        equality_guard, hash_combine, inequality_guard, null_assert, null_guard, pointee_equals, pointee_hash,
        pointees_equal,
    },
};
use gentool_core::{Borrow, Element, Language, NameStyle, PLACEHOLDER, Scalar, TypeTag, substitute};
use gentool_schema::{
    Accessor, ClassDef, Constructor, ConstructorKind, Definition, MethodMode, OperatorProperty, Property, Registry,
    Visibility,
};

/// Declaration groups inside one access section, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Group {
    Lifecycle,
    Operators,
    Methods,
    Functions,
    Variables,
    Friends,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub visibility: Visibility,
    pub group: Group,
    pub declaration: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClassLayout {
    pub members: Vec<Member>,
    /// Definitions inside `namespace psm`.
    pub definitions: Vec<String>,
    /// Declarations after the class, inside `namespace psm`.
    pub free_declarations: Vec<String>,
    /// `std::hash` specialization declaration and definition.
    pub hash: Option<(String, Option<String>)>,
    pub header_includes: IncludeCollector,
    pub source_includes: IncludeCollector,
}

impl ClassLayout {
    pub fn build(def: &ClassDef, registry: &Registry) -> Result<Self> {
        LayoutBuilder::new(def, registry).build()
    }

    /// Members of one section, grouped; empty groups are skipped.
    pub fn section(&self, visibility: Visibility) -> Vec<Vec<&Member>> {
        let mut members: Vec<&Member> = self.members.iter().filter(|m| m.visibility == visibility).collect();
        members.sort_by_key(|m| m.group);
        let mut groups: Vec<Vec<&Member>> = Vec::new();
        for member in members {
            match groups.last_mut() {
                Some(group) if group[0].group == member.group => group.push(member),
                _ => groups.push(vec![member]),
            }
        }
        groups
    }
}

struct LayoutBuilder<'a> {
    def: &'a ClassDef,
    registry: &'a Registry,
    speller: TypeSpeller<'a>,
    qualified: TypeSpeller<'a>,
    class: &'a str,
    arg: &'a str,
    layout: ClassLayout,
}

impl<'a> LayoutBuilder<'a> {
    fn new(def: &'a ClassDef, registry: &'a Registry) -> Self {
        Self {
            def,
            registry,
            speller: TypeSpeller::new(registry),
            qualified: TypeSpeller::new(registry).qualified(true),
            class: def.name.lang(Language::Cxx),
            arg: def.name.style(NameStyle::CamelBack),
            layout: ClassLayout::default(),
        }
    }

    fn declare(&mut self, visibility: Visibility, group: Group, declaration: String) {
        self.layout.members.push(Member {
            visibility,
            group,
            declaration,
        });
    }

    fn define(&mut self, definition: String) {
        self.layout.definitions.push(definition);
    }

    fn build(mut self) -> Result<ClassLayout> {
        self.layout.header_includes.local("API.hpp");
        self.layout
            .source_includes
            .system(&format!("Posemesh/{}.hpp", self.class));

        self.static_variables()?;
        for kind in ConstructorKind::ALL {
            self.constructor(self.def.constructor(kind));
        }
        self.destructor();
        for kind in [ConstructorKind::Copy, ConstructorKind::Move] {
            self.assignment(self.def.constructor(kind));
        }
        self.equality();
        self.to_string()?;
        for property in &self.def.properties {
            self.referenced(&property.type_tag)?;
            self.getter(property)?;
            self.setter(property)?;
        }
        self.member_variables()?;
        self.hash()?;
        Ok(self.layout)
    }

    fn referenced(&mut self, tag: &TypeTag) -> Result<()> {
        match tag {
            TypeTag::Scalar(scalar) if scalar.is_integer() => self.layout.header_includes.system("cstdint"),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => self.layout.header_includes.system("string"),
            _ => {}
        }
        if tag.is_class_ptr() || tag.is_array_ptr() {
            self.layout.header_includes.system("memory");
        }
        if tag.is_array() {
            self.layout.header_includes.system("vector");
        }
        if let TypeTag::Array(Element::String) | TypeTag::ArrayRef(Element::String) | TypeTag::ArrayMix(Element::String) = tag {
            self.layout.header_includes.system("string");
        }
        if let Some(name) = tag.referenced_name() {
            if name != self.def.name.canonical() {
                let entity = self
                    .registry
                    .get(name)
                    .ok_or_else(|| eyre::eyre!("'{name}' is referenced but was not normalized"))?;
                self.layout
                    .header_includes
                    .local(&format!("{}.hpp", entity.name().lang(Language::Cxx)));
            }
        }
        Ok(())
    }

    fn noexcept(flag: bool) -> &'static str {
        if flag { " noexcept" } else { "" }
    }

    fn constructor(&mut self, ctor: &Constructor) {
        let definition = ctor.definition.get();
        if definition == Definition::Omitted {
            return;
        }
        let class = self.class;
        let arg_name = ctor
            .assignment
            .as_ref()
            .map(|a| a.main_arg_name.lang(Language::Cxx).to_string())
            .unwrap_or_default();
        let params = match ctor.kind {
            ConstructorKind::Parameterless => String::new(),
            ConstructorKind::Copy => format!("const {class}& {arg_name}"),
            ConstructorKind::Move => format!("{class}&& {arg_name}"),
        };
        let noexcept = Self::noexcept(ctor.noexcept.get());

        let declaration = if definition == Definition::Deleted {
            format!("{class}({params}) = delete;")
        } else {
            format!("PSM_API {class}({params}){noexcept};")
        };
        self.declare(ctor.visibility.get(), Group::Lifecycle, declaration);

        let signature = format!("{class}::{class}({params}){noexcept}");
        match definition {
            Definition::Default => self.define(format!("{signature} = default;\n")),
            Definition::Defined if !ctor.custom.get() => {
                let access = |member: &str| format!("{arg_name}.{member}");
                let mut list = Vec::new();
                let mut assignments = Vec::new();
                for init in ctor.initialized_properties.iter() {
                    let Some(property) = self.def.property(&init.name) else {
                        continue;
                    };
                    let member = property.name.lang(Language::Cxx);
                    let value = if ctor.kind == ConstructorKind::Parameterless {
                        init.value.value().clone()
                    } else {
                        substitute(init.value.value(), init.placeholder.value(), &access(member))
                    };
                    if init.in_body.get() {
                        assignments.push(format!("{member} = {value};"));
                    } else {
                        list.push(format!("{member}({value})"));
                    }
                }

                let mut b = CodeBuilder::c();
                b.push_line(&signature);
                for (index, entry) in list.iter().enumerate() {
                    let lead = if index == 0 { ':' } else { ',' };
                    b.push_line(&format!("    {lead} {entry}"));
                }
                b.push_line("{");
                b.push_indent();
                b.push_lines(ctor.code_front.iter());
                b.push_lines(&assignments);
                b.push_lines(ctor.code_back.iter());
                b.push_dedent();
                b.push_line("}");
                self.define(b.build());
            }
            _ => {}
        }
    }

    fn destructor(&mut self) {
        let dtor = &self.def.destructor;
        let definition = dtor.definition.get();
        if definition == Definition::Omitted {
            return;
        }
        let class = self.class;
        let declaration = if definition == Definition::Deleted {
            format!("~{class}() = delete;")
        } else if dtor.is_virtual.get() {
            format!("virtual PSM_API ~{class}();")
        } else {
            format!("PSM_API ~{class}();")
        };
        self.declare(dtor.visibility.get(), Group::Lifecycle, declaration);

        let signature = format!("{class}::~{class}()");
        match definition {
            Definition::Default => self.define(format!("{signature} = default;\n")),
            Definition::Defined if !dtor.custom.get() => {
                let mut b = CodeBuilder::c();
                b.push_function(&signature, |b| {
                    b.push_lines(dtor.code.iter());
                });
                self.define(b.build());
            }
            _ => {}
        }
    }

    fn assignment(&mut self, ctor: &Constructor) {
        let Some(assignment) = &ctor.assignment else {
            return;
        };
        let definition = ctor.definition.get();
        if definition == Definition::Omitted {
            return;
        }
        let class = self.class;
        let arg_name = assignment.main_arg_name.lang(Language::Cxx);
        let param = match ctor.kind {
            ConstructorKind::Move => format!("{class}&& {arg_name}"),
            _ => format!("const {class}& {arg_name}"),
        };
        let noexcept = Self::noexcept(ctor.noexcept.get());

        let declaration = if definition == Definition::Deleted {
            format!("{class}& operator=({param}) = delete;")
        } else {
            format!("{class}& PSM_API operator=({param}){noexcept};")
        };
        self.declare(ctor.visibility.get(), Group::Operators, declaration);

        let signature = format!("{class}& {class}::operator=({param}){noexcept}");
        match definition {
            Definition::Default => self.define(format!("{signature} = default;\n")),
            Definition::Defined if !assignment.custom.get() => {
                let mut body = vec![
                    format!("if (&{arg_name} == this) {{"),
                    "    return *this;".to_string(),
                    "}".to_string(),
                ];
                body.extend(assignment.code_front.iter().cloned());
                for init in ctor.initialized_properties.iter() {
                    let Some(property) = self.def.property(&init.name) else {
                        continue;
                    };
                    let member = property.name.lang(Language::Cxx);
                    let value = substitute(init.value.value(), init.placeholder.value(), &format!("{arg_name}.{member}"));
                    body.push(format!("{member} = {value};"));
                }
                body.extend(assignment.code_back.iter().cloned());
                body.push("return *this;".to_string());

                let mut b = CodeBuilder::c();
                b.push_function(&signature, |b| {
                    b.push_lines(&body);
                });
                self.define(b.build());
            }
            _ => {}
        }
    }

    /// Access to a compared or hashed property through `object`, or
    /// through `this` when `object` is empty.
    fn operand(&self, entry: &OperatorProperty, object: &str) -> Option<String> {
        let property = self.def.property(&entry.name)?;
        let prefix = if object.is_empty() {
            String::new()
        } else {
            format!("{object}.")
        };
        Some(if entry.use_getter.get() {
            format!("{prefix}{}()", property.getter.name.lang(Language::Cxx))
        } else {
            format!("{prefix}{}", property.name.lang(Language::Cxx))
        })
    }

    fn equality(&mut self) {
        let equality = &self.def.equality_operator;
        if !equality.defined.get() {
            return;
        }
        let class = self.class;
        let arg = self.arg;
        self.declare(
            Visibility::Public,
            Group::Operators,
            format!("bool PSM_API operator==(const {class}& {arg}) const noexcept;"),
        );
        self.declare(
            Visibility::Public,
            Group::Operators,
            format!("bool PSM_API operator!=(const {class}& {arg}) const noexcept;"),
        );

        if !equality.custom.get() {
            let mut body = Vec::new();
            let mut ranges = false;
            if equality.compare_pointers.get() {
                body.push(format!("return this == &{arg};"));
            } else {
                for entry in equality.compared_properties.iter() {
                    let (Some(property), Some(lhs), Some(rhs)) =
                        (self.def.property(&entry.name), self.operand(entry, ""), self.operand(entry, arg))
                    else {
                        continue;
                    };
                    let (lhs, rhs) = (entry.apply(&lhs), entry.apply(&rhs));
                    if !entry.dereference.get() {
                        body.extend(inequality_guard(&lhs, &rhs));
                    } else if property.type_tag.is_array_ptr() {
                        ranges = true;
                        body.extend(equality_guard(&pointees_equal(&lhs, &rhs)));
                    } else {
                        body.extend(equality_guard(&pointee_equals(&lhs, &rhs)));
                    }
                }
                body.push("return true;".to_string());
            }
            if ranges {
                self.layout.source_includes.system("algorithm");
            }
            let mut b = CodeBuilder::c();
            b.push_function(
                &format!("bool {class}::operator==(const {class}& {arg}) const noexcept"),
                |b| {
                    b.push_lines(&body);
                },
            );
            self.define(b.build());
        }
        if !equality.custom_inequality.get() {
            let mut b = CodeBuilder::c();
            b.push_function(
                &format!("bool {class}::operator!=(const {class}& {arg}) const noexcept"),
                |b| {
                    b.push_line(&format!("return !(*this == {arg});"));
                },
            );
            self.define(b.build());
        }
    }

    fn hash(&mut self) -> Result<()> {
        let hash = &self.def.hash_operator;
        if !hash.defined.get() {
            return Ok(());
        }
        self.layout.header_includes.system("functional");
        let class = self.class;
        let arg = self.arg;
        let qualified = format!("{CXX_NAMESPACE}::{class}");
        self.declare(
            Visibility::Private,
            Group::Friends,
            format!("friend struct std::hash<{class}>;"),
        );

        let declaration = format!("std::size_t PSM_API operator()(const {qualified}& {arg}) const noexcept;");
        if hash.custom.get() {
            self.layout.hash = Some((declaration, None));
            return Ok(());
        }

        let mut body = Vec::new();
        if hash.use_pointer_as_hash.get() {
            body.push(format!("return hash<const {qualified}*> {{}}(&{arg});"));
        } else {
            body.push("std::size_t result = 0;".to_string());
            for entry in hash.hashed_properties.iter() {
                let Some(property) = self.def.property(&entry.name) else {
                    continue;
                };
                let Some(access) = self.operand(entry, arg) else {
                    continue;
                };
                let value = entry.apply(&access);
                let dereference = entry.dereference.get();
                let contribution = if property.type_tag.is_array() {
                    let element = if dereference {
                        pointee_hash("element")
                    } else {
                        "hash<std::decay_t<decltype(element)>> {}(element)".to_string()
                    };
                    format!(
                        "[&] {{ std::size_t h = 0; for (const auto& element : {value}) {{ {} }} return h; }}()",
                        hash_combine("h", &element)
                    )
                } else if dereference {
                    format!("[](const auto& pointer) {{ return {}; }}({value})", pointee_hash("pointer"))
                } else if entry.normalized_expression() == PLACEHOLDER {
                    let ty = self.qualified.spell(&property.type_tag, Language::Cxx, UseSite::Any)?;
                    format!("hash<{ty}> {{}}({value})")
                } else {
                    format!("hash<std::decay_t<decltype({value})>> {{}}({value})")
                };
                body.push(hash_combine("result", &contribution));
            }
            body.push("return result;".to_string());
        }

        let mut b = CodeBuilder::c();
        b.push_function(
            &format!("std::size_t hash<{qualified}>::operator()(const {qualified}& {arg}) const noexcept"),
            |b| {
                b.push_lines(&body);
            },
        );
        self.layout.hash = Some((declaration, Some(b.build())));
        Ok(())
    }

    /// Stream expression printing one property of `*this`.
    fn display(&self, property: &Property, access: &str) -> String {
        let tag = &property.type_tag;
        let has_to_string = |name: &str| {
            self.registry
                .class_def(name)
                .is_some_and(|c| c.to_string_operator.defined.get())
        };
        match tag {
            TypeTag::Scalar(Scalar::Boolean) => format!("({access} ? \"true\" : \"false\")"),
            TypeTag::Scalar(Scalar::Int8 | Scalar::UInt8) => format!("static_cast<int>({access})"),
            TypeTag::Scalar(_) => access.to_string(),
            TypeTag::Enum(_) => format!("static_cast<long long>({access})"),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => format!("'\"' << {access} << '\"'"),
            TypeTag::Class(name) | TypeTag::ClassRef(name) | TypeTag::ClassMix(name) => {
                if has_to_string(name) {
                    format!("static_cast<std::string>({access})")
                } else {
                    "\"{...}\"".to_string()
                }
            }
            TypeTag::ClassPtr(name) | TypeTag::ClassPtrRef(name) | TypeTag::ClassPtrMix(name) => {
                if has_to_string(name) {
                    format!("({access} ? static_cast<std::string>(*{access}) : std::string {{ \"null\" }})")
                } else {
                    format!("({access} ? \"{{...}}\" : \"null\")")
                }
            }
            _ => format!("'[' << {access}.size() << ']'"),
        }
    }

    fn to_string(&mut self) -> Result<()> {
        let to_string = &self.def.to_string_operator;
        if !to_string.defined.get() {
            return Ok(());
        }
        self.layout.header_includes.system("ostream");
        self.layout.header_includes.system("string");
        let class = self.class;
        let arg = self.arg;
        self.declare(
            Visibility::Public,
            Group::Operators,
            "explicit PSM_API operator std::string() const;".to_string(),
        );
        self.layout
            .free_declarations
            .push(format!("PSM_API std::ostream& operator<<(std::ostream& stream, const {class}& {arg});"));

        if to_string.custom.get() {
            return Ok(());
        }
        self.layout.source_includes.system("sstream");

        let mut body = vec![
            "std::ostringstream stream;".to_string(),
            format!("stream << \"{class} {{\";"),
        ];
        let shown: Vec<&Property> = self
            .def
            .properties
            .iter()
            .filter(|p| !p.is_static.get() && (p.has_member_var.get() || p.getter.present.get()))
            .collect();
        for (index, property) in shown.iter().enumerate() {
            let access = if property.has_member_var.get() {
                property.name.lang(Language::Cxx).to_string()
            } else {
                format!("{}()", property.getter.name.lang(Language::Cxx))
            };
            let separator = if index == 0 { " " } else { ", " };
            body.push(format!(
                "stream << \"{separator}{}: \" << {};",
                property.name.style(NameStyle::CamelBack),
                self.display(property, &access)
            ));
        }
        body.push("stream << \" }\";".to_string());
        body.push("return stream.str();".to_string());

        let mut b = CodeBuilder::c();
        b.push_function(&format!("{class}::operator std::string() const"), |b| {
            b.push_lines(&body);
        });
        self.define(b.build());

        let mut b = CodeBuilder::c();
        b.push_function(
            &format!("std::ostream& operator<<(std::ostream& stream, const {class}& {arg})"),
            |b| {
                b.push_line(&format!("return stream << static_cast<std::string>({arg});"));
            },
        );
        self.define(b.build());
        Ok(())
    }

    /// Qualifiers around an accessor declaration: leading and trailing.
    fn qualifiers(accessor: &Accessor, is_static: bool) -> (&'static str, String) {
        if is_static {
            return ("static ", Self::noexcept(accessor.noexcept.get()).to_string());
        }
        let constness = if accessor.is_const.get() { " const" } else { "" };
        let noexcept = Self::noexcept(accessor.noexcept.get());
        match accessor.mode.get() {
            MethodMode::Regular => ("", format!("{constness}{noexcept}")),
            MethodMode::Virtual => ("virtual ", format!("{constness}{noexcept}")),
            MethodMode::PureVirtual => ("virtual ", format!("{constness}{noexcept} = 0")),
            MethodMode::Override => ("", format!("{constness}{noexcept} override")),
        }
    }

    fn group(property: &Property) -> Group {
        if property.is_static.get() {
            Group::Functions
        } else {
            Group::Methods
        }
    }

    fn getter(&mut self, property: &Property) -> Result<()> {
        let getter = &property.getter;
        if !getter.present.get() {
            return Ok(());
        }
        let class = self.class;
        let name = getter.name.lang(Language::Cxx);
        let ty = self.speller.spell(&property.type_tag, Language::Cxx, UseSite::Getter)?;
        let is_static = property.is_static.get();
        let (lead, trail) = Self::qualifiers(getter, is_static);
        self.declare(
            getter.visibility.get(),
            Self::group(property),
            format!("{lead}{ty} PSM_API {name}(){trail};"),
        );

        let implemented = !getter.custom.get() && getter.mode.get() != MethodMode::PureVirtual;
        if implemented && property.has_member_var.get() {
            let constness = if getter.is_const.get() && !is_static { " const" } else { "" };
            let noexcept = Self::noexcept(getter.noexcept.get());
            let member = property.name.lang(Language::Cxx);
            let mut b = CodeBuilder::c();
            b.push_function(&format!("{ty} {class}::{name}(){constness}{noexcept}"), |b| {
                b.push_line(&format!("return {member};"));
            });
            self.define(b.build());
        }
        Ok(())
    }

    fn setter(&mut self, property: &Property) -> Result<()> {
        let setter = &property.setter;
        if !setter.present.get() {
            return Ok(());
        }
        let class = self.class;
        let tag = &property.type_tag;
        let name = setter.name.lang(Language::Cxx);
        let arg = property.setter_arg_name.lang(Language::Cxx);
        let ty = self.speller.spell(tag, Language::Cxx, UseSite::Setter)?;
        let is_static = property.is_static.get();
        let (lead, trail) = Self::qualifiers(setter, is_static);
        self.declare(
            setter.visibility.get(),
            Self::group(property),
            format!("{lead}void PSM_API {name}({ty} {arg}){trail};"),
        );

        let implemented = !setter.custom.get() && setter.mode.get() != MethodMode::PureVirtual;
        if !implemented || !property.has_member_var.get() {
            return Ok(());
        }

        let function = format!("{class}::{name}");
        let mut body = Vec::new();
        if tag.is_class_ptr() {
            self.layout.source_includes.system("cassert");
            body.extend(null_guard(&function, arg, None));
        } else if tag.is_array_ptr() {
            self.layout.source_includes.system("cassert");
            body.push(format!("for (const auto& element : {arg}) {{"));
            body.push("    if (!element) {".to_string());
            body.push(format!("        {}", null_assert(&function, &format!("{arg} element"))));
            body.push("        return;".to_string());
            body.push("    }".to_string());
            body.push("}".to_string());
        }
        let moved = !tag.is_primitive() && tag.borrow() != Borrow::Ref;
        let member = property.name.lang(Language::Cxx);
        if moved {
            self.layout.source_includes.system("utility");
            body.push(format!("{member} = std::move({arg});"));
        } else {
            body.push(format!("{member} = {arg};"));
        }

        let constness = if setter.is_const.get() && !is_static { " const" } else { "" };
        let noexcept = Self::noexcept(setter.noexcept.get());
        let mut b = CodeBuilder::c();
        b.push_function(&format!("void {function}({ty} {arg}){constness}{noexcept}"), |b| {
            b.push_lines(&body);
        });
        self.define(b.build());
        Ok(())
    }

    fn member_variables(&mut self) -> Result<()> {
        for property in &self.def.properties {
            if !property.has_member_var.get() || property.is_static.get() {
                continue;
            }
            let ty = self.speller.spell(&property.type_tag, Language::Cxx, UseSite::Any)?;
            let member = property.name.lang(Language::Cxx);
            let declaration = match property.type_tag.implicit_default() {
                "" => format!("{ty} {member};"),
                zero => format!("{ty} {member} {{{zero}}};"),
            };
            self.declare(Visibility::Private, Group::Variables, declaration);
        }
        Ok(())
    }

    /// Static members are declared in the class and defined first in the
    /// source.
    fn static_variables(&mut self) -> Result<()> {
        for property in &self.def.properties {
            if !property.has_member_var.get() || !property.is_static.get() {
                continue;
            }
            let ty = self.speller.spell(&property.type_tag, Language::Cxx, UseSite::Any)?;
            let member = property.name.lang(Language::Cxx);
            self.declare(Visibility::Private, Group::Variables, format!("static {ty} {member};"));

            let value = if property.default_value.is_empty() {
                property.type_tag.implicit_default()
            } else {
                property.default_value.value().as_str()
            };
            self.define(format!("{ty} {}::{member} {{{value}}};\n", self.class));
        }
        Ok(())
    }
}
