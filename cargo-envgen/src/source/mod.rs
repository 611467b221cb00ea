//! Read-only view over the declarations of a codebase.
//!
//! The pipeline never inspects source syntax directly. It consumes
//! [`Declaration`] values through the [`DeclarationSource`] trait, which
//! exposes names, visibility, the owning module path, and the `@tag`
//! annotations found in doc comments on the declaration and on each field.

mod rust;

pub use rust::RustSource;

use camino::Utf8PathBuf;

use crate::error::EnvgenError;

/// Produces declarations from a set of source roots.
pub trait DeclarationSource {
    /// Lists every declaration below `roots`, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error when a root cannot be read or a file fails to parse.
    fn list_declarations(&self, roots: &[Utf8PathBuf]) -> Result<Vec<Declaration>, EnvgenError>;
}

/// Visibility of a declaration or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Declared `pub`.
    Public,
    /// Restricted with `pub(crate)`, `pub(super)` or `pub(in ..)`.
    Restricted,
    /// No visibility qualifier.
    Private,
}

/// Syntactic kind of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// A struct with named fields.
    Record,
    /// A tuple or unit struct.
    TupleStruct,
    /// An `enum`.
    Enum,
    /// A `union`.
    Union,
    /// A `trait`.
    Trait,
    /// A `type` alias.
    TypeAlias,
}

/// A `@tag(...)` line found in a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The tag literal including its `@`, for example `@envconfig`.
    pub tag: String,
    /// Everything after the tag on the same line, trimmed.
    pub args: String,
}

impl Annotation {
    /// Parses a single doc-comment line, returning `None` unless it starts with `@`.
    #[must_use]
    pub fn from_doc_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if !trimmed.starts_with('@') {
            return None;
        }
        let end = trimmed
            .find(|ch: char| ch == '(' || ch.is_whitespace())
            .unwrap_or(trimmed.len());
        let (tag, rest) = trimmed.split_at(end);
        Some(Self {
            tag: tag.to_owned(),
            args: rest.trim().to_owned(),
        })
    }
}

/// Finds the first annotation carrying `tag`.
#[must_use]
pub fn find_annotation<'a>(annotations: &'a [Annotation], tag: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.tag == tag)
}

/// One field of a record declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Identifier as written in source, `r#` prefix included.
    pub ident: String,
    /// Identifier without any `r#` prefix; used to derive variable names.
    pub name: String,
    /// Field visibility; private fields can only be set from within the
    /// declaring module and its descendants.
    pub visibility: Visibility,
    /// Annotations from the field's doc comment, in source order.
    pub annotations: Vec<Annotation>,
}

/// A type-level definition found in the scanned sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Type name, for example `PostgresConfig`.
    pub name: String,
    /// Declared visibility; only [`Visibility::Public`] items are candidates.
    pub visibility: Visibility,
    /// Syntactic kind.
    pub kind: DeclarationKind,
    /// Module path of the owning module, for example `crate::db`.
    pub package: String,
    /// File the declaration was read from.
    pub file: Utf8PathBuf,
    /// Annotations from the declaration's doc comment, in source order.
    pub annotations: Vec<Annotation>,
    /// Named fields; empty for anything but [`DeclarationKind::Record`].
    pub fields: Vec<FieldDecl>,
}

impl Declaration {
    /// Fully qualified name used in diagnostics.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.package, self.name)
    }
}
