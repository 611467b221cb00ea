//! Library interface for `cargo-envgen`.
//!
//! Scans a crate for public structs annotated with `@envconfig` in their doc
//! comments and generates, from a single model:
//!
//! - a Rust source file with one environment loader per struct,
//! - an optional `.env` template listing every key and default,
//! - an optional Markdown usage document.
//!
//! ```rust
//! /// @envconfig(prefix: "PG")
//! pub struct PostgresConfig {
//!     /// @envconfig(default: "localhost")
//!     pub host: String,
//!     /// @envconfig(required: true)
//!     pub port: u16,
//! }
//! ```
//!
//! yields `load_postgres_config()`, reading `PG_HOST` and `PG_PORT`.

pub mod annotate;
pub mod config;
pub mod directive;
pub mod error;
pub mod filter;
pub mod fs_helpers;
pub mod generate;
pub mod imports;
pub mod model;
pub mod normalize;
pub mod project;
pub mod source;
pub mod templates;

pub use annotate::{AnnotateProject, Annotator, EnvconfigAnnotation, Report};
pub use config::{GeneratorConfig, Settings};
pub use error::EnvgenError;
pub use project::ProjectContext;

/// Runs the standard `@envconfig` pipeline for `project`.
///
/// # Errors
///
/// Returns the first error raised while scanning, extracting or writing.
pub fn generate(project: &ProjectContext, settings: Settings) -> Result<Report, EnvgenError> {
    AnnotateProject::for_settings(settings).run(project)
}
