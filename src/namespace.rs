//! Short type name → fully-qualified name resolution for docblock types.
//!
//! Each class carries a `<uses>` block of imports. Docblock attributes
//! (`@param`, `@return`, `@var`) want the fully-qualified spelling, so the
//! type a definition writes as `Foo` becomes `\App\Model\Foo` in the
//! generated documentation. Builtin scalar/pseudo types stay as written, and
//! anything unknown is treated as a class in the global namespace.

use std::collections::HashMap;

/// Type spellings that are never namespace-qualified.
const BUILTIN_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "array", "iterable",
    "callable", "void", "resource",
];

/// Per-class import table: short name (segment after the last `\`) to the
/// fully-qualified name. Built once from `<uses>`, read-only afterward.
#[derive(Debug, Default)]
pub struct UsedNamespaces {
    map: HashMap<String, String>,
}

impl UsedNamespaces {
    /// Build the table from fully-qualified `use` values.
    pub fn from_uses(uses: &[String]) -> UsedNamespaces {
        let mut map = HashMap::new();
        for full in uses {
            let short = full.rsplit('\\').next().unwrap_or(full);
            map.insert(short.to_string(), full.clone());
        }
        UsedNamespaces { map }
    }

    /// Resolve a type string for documentation.
    ///
    /// Union members (`A|B`) resolve independently and are rejoined. A
    /// leading `?` marks the member nullable and comes back as a literal
    /// `|null` suffix: `?Foo` → `\App\Model\Foo|null`.
    pub fn fully_qualified_name(&self, type_name: &str) -> String {
        type_name
            .split('|')
            .map(|member| self.resolve_member(member))
            .collect::<Vec<_>>()
            .join("|")
    }

    fn resolve_member(&self, member: &str) -> String {
        let (name, nullable) = match member.strip_prefix('?') {
            Some(stripped) => (stripped, true),
            None => (member, false),
        };

        if name.is_empty() {
            return member.to_string();
        }

        let resolved = if let Some(full) = self.map.get(name) {
            format!("\\{}", full)
        } else if !BUILTIN_TYPES.contains(&name) {
            // Not imported and not a builtin: a class in the global namespace.
            format!("\\{}", name)
        } else {
            name.to_string()
        };

        if nullable {
            format!("{}|null", resolved)
        } else {
            resolved
        }
    }
}
