//! `#include` collection.

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// Include group; groups render in declaration order, one blank line apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncludeGroup {
    /// `#include <...>`
    System,
    /// `#include "..."`
    Local,
}

/// Tracks includes for one generated file and deduplicates them.
///
/// Each emitter owns its collectors; the body is built first and the
/// include block is rendered once it is complete.
///
/// # Example
///
/// ```
/// use gentool_codegen::generation::IncludeCollector;
///
/// let mut includes = IncludeCollector::new();
/// includes.system("string");
/// includes.system("cstdint");
/// includes.local("API.hpp");
/// includes.system("string");
///
/// assert_eq!(
///     includes.render(),
///     "#include <cstdint>\n#include <string>\n\n#include \"API.hpp\"\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct IncludeCollector {
    /// Group -> set of paths (sorted for deterministic output)
    groups: IndexMap<IncludeGroup, BTreeSet<String>>,
}

impl IncludeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, group: IncludeGroup, path: &str) {
        self.groups.entry(group).or_default().insert(path.to_string());
    }

    /// Add `#include <path>`.
    pub fn system(&mut self, path: &str) {
        self.add(IncludeGroup::System, path);
    }

    /// Add `#include "path"`.
    pub fn local(&mut self, path: &str) {
        self.add(IncludeGroup::Local, path);
    }

    pub fn merge(&mut self, other: &IncludeCollector) {
        for (group, paths) in &other.groups {
            self.groups.entry(*group).or_default().extend(paths.iter().cloned());
        }
    }

    pub fn contains(&self, group: IncludeGroup, path: &str) -> bool {
        self.groups.get(&group).is_some_and(|paths| paths.contains(path))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }

    /// Render every group, system includes first.
    pub fn render(&self) -> String {
        let mut groups: Vec<_> = self.groups.iter().filter(|(_, paths)| !paths.is_empty()).collect();
        groups.sort_by_key(|(group, _)| **group);

        let blocks: Vec<String> = groups
            .into_iter()
            .map(|(group, paths)| {
                paths
                    .iter()
                    .map(|path| match group {
                        IncludeGroup::System => format!("#include <{path}>\n"),
                        IncludeGroup::Local => format!("#include \"{path}\"\n"),
                    })
                    .collect()
            })
            .collect();
        blocks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_groups_in_order() {
        let mut includes = IncludeCollector::new();
        includes.local("Vector3.hpp");
        includes.system("memory");
        includes.local("API.hpp");

        assert_eq!(
            includes.render(),
            "#include <memory>\n\n#include \"API.hpp\"\n#include \"Vector3.hpp\"\n"
        );
    }

    #[test]
    fn test_merge() {
        let mut a = IncludeCollector::new();
        a.system("cassert");
        let mut b = IncludeCollector::new();
        b.system("new");
        b.system("cassert");
        a.merge(&b);

        assert!(a.contains(IncludeGroup::System, "new"));
        assert_eq!(a.render(), "#include <cassert>\n#include <new>\n");
    }

    #[test]
    fn test_empty() {
        let includes = IncludeCollector::new();
        assert!(includes.is_empty());
        assert_eq!(includes.render(), "");
    }
}
