//! Predicates deciding which declarations are generation candidates.

use crate::source::{Declaration, DeclarationKind, Visibility, find_annotation};

/// A single yes/no test over a declaration.
pub trait Filter {
    /// Returns `true` when `decl` passes this filter.
    fn matches(&self, decl: &Declaration) -> bool;
}

/// Accepts declarations whose doc comment carries `tag`.
#[derive(Debug, Clone)]
pub struct TagNameFilter {
    tag: String,
}

impl TagNameFilter {
    /// Creates a filter for the given tag literal, for example `@envconfig`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Filter for TagNameFilter {
    fn matches(&self, decl: &Declaration) -> bool {
        find_annotation(&decl.annotations, &self.tag).is_some()
    }
}

/// Accepts `pub` declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicFilter;

impl Filter for PublicFilter {
    fn matches(&self, decl: &Declaration) -> bool {
        decl.visibility == Visibility::Public
    }
}

/// Accepts structs with named fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructFilter;

impl Filter for StructFilter {
    fn matches(&self, decl: &Declaration) -> bool {
        decl.kind == DeclarationKind::Record
    }
}

/// Ordered conjunction of filters; stops at the first rejection.
#[derive(Default)]
pub struct Filters(Vec<Box<dyn Filter>>);

impl Filters {
    /// Creates an empty chain that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter to the end of the chain.
    #[must_use]
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.0.push(Box::new(filter));
        self
    }

    /// The chain used for `@envconfig`-style annotations.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        Self::new()
            .with(TagNameFilter::new(tag))
            .with(PublicFilter)
            .with(StructFilter)
    }
}

impl Filter for Filters {
    fn matches(&self, decl: &Declaration) -> bool {
        self.0.iter().all(|filter| filter.matches(decl))
    }
}

impl std::fmt::Debug for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Filters").field(&self.0.len()).finish()
    }
}
