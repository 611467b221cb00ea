//! Error types for `cargo-envgen`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `cargo-envgen` pipeline.
///
/// None of these are retried: each one is a deterministic consequence of the
/// scanned sources, the configuration, or the local filesystem.
#[derive(Debug, Error)]
pub enum EnvgenError {
    /// An annotation's parameter list could not be parsed.
    #[error("malformed annotation on '{declaration}': {message} (near `{fragment}`)")]
    AnnotationParse {
        /// Qualified name of the annotated declaration or field.
        declaration: String,
        /// Remaining parameter text at the point of failure.
        fragment: String,
        /// What the parser expected.
        message: String,
    },

    /// A template failed to parse or render.
    #[error("failed to render template '{template}': {source}")]
    TemplateRender {
        /// Template name (`loader`, `dotenv` or `usage-doc`).
        template: String,
        /// Underlying `tera` error.
        #[source]
        source: tera::Error,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read, written or removed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Rendered loader source is not valid Rust.
    #[error("failed to normalise imports in {path}: {message}")]
    PostProcess {
        /// Loader target the source was destined for.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A scanned source file is not valid Rust.
    #[error("failed to parse Rust source {path}: {message}")]
    SourceParse {
        /// Offending source file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A configuration layer could not be extracted.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// `Cargo.toml` is missing its package table or is not valid TOML.
    #[error("invalid manifest {path}: {message}")]
    Manifest {
        /// Manifest path.
        path: Utf8PathBuf,
        /// What was wrong with it.
        message: String,
    },
}

impl EnvgenError {
    /// Wraps an I/O failure with the path it occurred at.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<figment::Error> for EnvgenError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
