//! Artifact generators.
//!
//! Each generator is a function of one [`crate::templates::TemplateData`] view over the
//! generation context. They run one after another; a failure in a later
//! generator leaves earlier artifacts in place.

mod dotenv;
mod loader;
mod usage_doc;

pub use dotenv::generate_dot_env;
pub use loader::generate_loader;
pub use usage_doc::generate_usage_doc;

use std::fmt;

use camino::Utf8PathBuf;

/// Which artifact a generator produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Generated Rust loader source.
    Loader,
    /// `.env`-style key listing.
    DotEnv,
    /// Markdown usage document.
    UsageDoc,
}

impl ArtifactKind {
    /// Returns the CLI-friendly name of this artifact.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loader => "loader",
            Self::DotEnv => "dotenv",
            Self::UsageDoc => "usage-doc",
        }
    }
}

/// What happened to an artifact on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAction {
    /// Created or replaced.
    Written,
    /// Deleted because nothing was left to generate.
    Removed,
}

/// One filesystem change made by a generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Generator that produced the change.
    pub kind: ArtifactKind,
    /// File that changed.
    pub path: Utf8PathBuf,
    /// What happened to it.
    pub action: ArtifactAction,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            ArtifactAction::Written => "wrote",
            ArtifactAction::Removed => "removed",
        };
        write!(f, "{verb} {} {}", self.kind.as_str(), self.path)
    }
}
