//! Stable, collision-free aliases for the modules referenced by generated code.

use indexmap::IndexMap;
use serde::Serialize;

/// Library imports every generated loader file needs, imported unaliased.
pub const WELL_KNOWN_IMPORTS: [&str; 3] = ["std::env", "std::fmt", "std::str::FromStr"];

/// Names an alias must never take, because generated code resolves them as
/// crate or primitive roots.
const RESERVED_ROOTS: [&str; 4] = ["std", "core", "alloc", "str"];

/// Insertion-ordered mapping from module path to alias.
///
/// An empty alias means "import without renaming". No two distinct module
/// paths ever share a non-empty alias. Aliases never shadow any segment of
/// an unaliased import, nor the `std`, `core`, `alloc` and `str` roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAliases {
    map: IndexMap<String, String>,
}

/// One rendered `use` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    /// Full module path, e.g. `crate::db`.
    pub path: String,
    /// Local name, or empty to import without renaming.
    pub alias: String,
}

impl ImportAliases {
    /// Creates a registry pre-seeded with [`WELL_KNOWN_IMPORTS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_well_known(&WELL_KNOWN_IMPORTS)
    }

    /// Creates a registry pre-seeded with the given unaliased imports.
    #[must_use]
    pub fn with_well_known(paths: &[&str]) -> Self {
        let map = paths
            .iter()
            .map(|path| ((*path).to_owned(), String::new()))
            .collect();
        Self { map }
    }

    /// Returns the alias for `path`, allocating one on first request.
    pub fn append(&mut self, path: &str) -> String {
        if let Some(alias) = self.map.get(path) {
            return alias.clone();
        }
        let base = base_alias(path);
        let mut alias = base.clone();
        let mut suffix = 2_u32;
        while self.is_taken(&alias) {
            alias = format!("{base}{suffix}");
            suffix += 1;
        }
        self.map.insert(path.to_owned(), alias.clone());
        alias
    }

    /// Looks up a previously allocated alias.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.map.get(path).map(String::as_str)
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as template-friendly values.
    #[must_use]
    pub fn to_imports(&self) -> Vec<Import> {
        self.iter()
            .map(|(path, alias)| Import {
                path: path.to_owned(),
                alias: alias.to_owned(),
            })
            .collect()
    }

    /// Number of registered paths, well-known imports included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn is_taken(&self, candidate: &str) -> bool {
        if RESERVED_ROOTS.contains(&candidate) {
            return true;
        }
        self.map.iter().any(|(path, alias)| {
            if alias.is_empty() {
                path.split("::").any(|segment| segment == candidate)
            } else {
                alias == candidate
            }
        })
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn base_alias(path: &str) -> String {
    match last_segment(path) {
        "" | "crate" => "root".to_owned(),
        segment => segment.trim_start_matches("r#").to_owned(),
    }
}
