use gentool_codegen::{
    CodeBuilder, banner,
    language::{c_enum_type, c_stem},
};
use gentool_core::{EntityKind, Language, NameStyle};
use gentool_schema::{EnumDef, Name};

/// `include/Posemesh/C/<Name>.h` for an enum.
pub struct EnumHeader<'a> {
    def: &'a EnumDef,
}

impl<'a> EnumHeader<'a> {
    pub fn new(def: &'a EnumDef) -> Self {
        Self { def }
    }

    fn constant(owner: &Name, constant: &str) -> String {
        format!("PSM_{}_{constant}", owner.style(NameStyle::UpperCase))
    }

    /// Enum body; `value` spells the initializer of each constant. Flag sets
    /// are stored as `uint32_t` rather than the enum type.
    fn push_enum(b: &mut CodeBuilder, owner: &Name, entries: Vec<(String, String)>, flag: bool) {
        let tag = c_stem(owner);
        if entries.is_empty() {
            b.push_line(&format!("enum {tag} {{ _ }};"));
        } else {
            b.push_line(&format!("enum {tag} {{"));
            let last = entries.len() - 1;
            for (index, (constant, value)) in entries.into_iter().enumerate() {
                let separator = if index == last { "" } else { "," };
                b.push_line(&format!("    {constant} = {value}{separator}"));
            }
            b.push_line("};");
        }
        if flag {
            b.push_line(&format!("typedef uint32_t {};", c_enum_type(owner)));
        } else {
            b.push_line(&format!("typedef enum {tag} {};", c_enum_type(owner)));
        }
    }

    pub fn render(&self) -> String {
        let def = self.def;
        let guard = format!("__POSEMESH_C_{}_H__", def.header_guard.value());
        // Flag values are spelled unsigned.
        let suffix = if def.is_flag() { "u" } else { "" };

        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Enum, def.name.canonical()));
        b.push_blank();
        b.push_line(&format!("#ifndef {guard}"));
        b.push_line(&format!("#define {guard}"));
        b.push_blank();
        b.push_line("#include <stdint.h>");
        b.push_blank();

        let entries = def
            .constants
            .iter()
            .map(|c| {
                let constant = c.name.lang(Language::C);
                (Self::constant(&def.name, constant), format!("{}{suffix}", c.value.get()))
            })
            .collect();
        Self::push_enum(&mut b, &def.name, entries, def.is_flag());

        for alias in def.aliases.iter() {
            b.push_blank();
            let entries = def
                .constants
                .iter()
                .map(|c| {
                    let constant = c.name.lang(Language::C);
                    (Self::constant(alias, constant), Self::constant(&def.name, constant))
                })
                .collect();
            Self::push_enum(&mut b, alias, entries, def.is_flag());
        }

        b.push_blank();
        b.push_line(&format!("#endif /* {guard} */"));
        b.build()
    }
}
