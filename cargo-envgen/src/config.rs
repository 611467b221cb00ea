//! Layered configuration for the generator itself.
//!
//! Values are merged, lowest precedence first, from built-in defaults, an
//! optional `envgen.toml` in the project root, `ENVGEN_*` environment
//! variables, and command-line overrides. [`GeneratorConfig::resolve`] then
//! applies every default exactly once and yields an immutable [`Settings`].

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::EnvgenError;
use crate::fs_helpers;
use crate::templates;

/// File name of the optional project-level configuration file.
pub const CONFIG_FILE_NAME: &str = "envgen.toml";
/// Prefix for environment-variable overrides.
pub const ENV_PREFIX: &str = "ENVGEN_";
/// Tag recognised when none is configured.
pub const DEFAULT_TAG_NAME: &str = "@envconfig";
/// Generated loader location, relative to the project root.
pub const DEFAULT_TARGET: &str = "src/envconfig_annotated.rs";
/// Directory holding the crate's `lib.rs`/`main.rs`.
pub const DEFAULT_CRATE_ROOT: &str = "src";

/// Partially specified configuration as read from one or more layers.
///
/// Empty strings are treated like absent values, so `dot_env = ""`
/// disables the env template just as omitting it does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Annotation tag to look for, `@` included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Inline loader template text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Path to a loader template file, used when `template` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    /// Generated loader path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Env template output path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_env: Option<String>,
    /// Usage documentation output path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_doc: Option<String>,
    /// Directories scanned for annotated declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// Directory that module paths are derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crate_root: Option<String>,
}

impl GeneratorConfig {
    /// Merges the file and environment layers beneath `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::Config`] when a layer holds values of the
    /// wrong shape.
    pub fn load(project_root: &Utf8Path, overrides: &Self) -> Result<Self, EnvgenError> {
        let figment = Figment::new()
            .merge(Toml::file(project_root.join(CONFIG_FILE_NAME)))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides));
        Ok(figment.extract()?)
    }

    /// Applies defaults and resolves paths against `project_root`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::Io`] when `template_file` cannot be read.
    pub fn resolve(self, project_root: &Utf8Path) -> Result<Settings, EnvgenError> {
        let template = match (non_empty(self.template), non_empty(self.template_file)) {
            (Some(text), _) => text,
            (None, Some(path)) => fs_helpers::read_file(&project_root.join(path))?,
            (None, None) => templates::LOADER.to_owned(),
        };
        let sources = self
            .sources
            .filter(|sources| !sources.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_CRATE_ROOT.to_owned()])
            .into_iter()
            .map(|source| project_root.join(source))
            .collect();

        Ok(Settings {
            tag_name: non_empty(self.tag_name).unwrap_or_else(|| DEFAULT_TAG_NAME.to_owned()),
            template,
            target: project_root
                .join(non_empty(self.target).unwrap_or_else(|| DEFAULT_TARGET.to_owned())),
            dot_env: non_empty(self.dot_env).map(|path| project_root.join(path)),
            usage_doc: non_empty(self.usage_doc).map(|path| project_root.join(path)),
            sources,
            crate_root: project_root.join(
                non_empty(self.crate_root).unwrap_or_else(|| DEFAULT_CRATE_ROOT.to_owned()),
            ),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Fully resolved generator settings. Paths are absolute or project-rooted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Annotation tag to look for.
    pub tag_name: String,
    /// Loader template text.
    pub template: String,
    /// Generated loader file.
    pub target: Utf8PathBuf,
    /// Env template file; `None` disables that artifact.
    pub dot_env: Option<Utf8PathBuf>,
    /// Usage document; `None` disables that artifact.
    pub usage_doc: Option<Utf8PathBuf>,
    /// Directories scanned for declarations.
    pub sources: Vec<Utf8PathBuf>,
    /// Directory that module paths are derived from.
    pub crate_root: Utf8PathBuf,
}

impl Settings {
    /// Settings with every default applied, rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the signature of
    /// [`GeneratorConfig::resolve`].
    pub fn defaults(project_root: &Utf8Path) -> Result<Self, EnvgenError> {
        GeneratorConfig::default().resolve(project_root)
    }
}
