//! Project metadata read from the target crate's manifest.
//!
//! The entry point loads a [`ProjectContext`] once and hands it to the
//! pipeline; nothing here is cached in process-wide state.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::EnvgenError;
use crate::fs_helpers;

/// Identity of the project being generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    /// Directory containing `Cargo.toml`.
    #[serde(skip)]
    pub root: Utf8PathBuf,
    /// `package.name`.
    pub name: String,
    /// `package.version`, empty when absent or inherited.
    pub version: String,
    /// `package.description`, empty when absent or inherited.
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    name: String,
    #[serde(default)]
    version: Option<toml::Value>,
    #[serde(default)]
    description: Option<toml::Value>,
}

impl ProjectContext {
    /// Creates a context without reading any manifest.
    pub fn new(root: impl Into<Utf8PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            version: String::new(),
            description: String::new(),
        }
    }

    /// Reads `[package]` from `root/Cargo.toml`.
    ///
    /// Workspace-inherited fields (`version.workspace = true`) are reported as
    /// empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::Io`] when the manifest cannot be read and
    /// [`EnvgenError::Manifest`] when it is not a package manifest.
    pub fn load(root: &Utf8Path) -> Result<Self, EnvgenError> {
        let path = root.join("Cargo.toml");
        let text = fs_helpers::read_file(&path)?;
        Self::from_manifest(root, &path, &text)
    }

    fn from_manifest(root: &Utf8Path, path: &Utf8Path, text: &str) -> Result<Self, EnvgenError> {
        let manifest: Manifest = toml::from_str(text).map_err(|err| EnvgenError::Manifest {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let package = manifest.package.ok_or_else(|| EnvgenError::Manifest {
            path: path.to_path_buf(),
            message: "missing [package] table".to_owned(),
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            name: package.name,
            version: plain_string(package.version),
            description: plain_string(package.description),
        })
    }
}

fn plain_string(value: Option<toml::Value>) -> String {
    match value {
        Some(toml::Value::String(text)) => text,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    //! Tests for manifest parsing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reads_package_identity() {
        let manifest = r#"
            [package]
            name = "billing"
            version = "1.4.0"
            description = "Billing service"
        "#;
        let ctx = ProjectContext::from_manifest(
            Utf8Path::new("/p"),
            Utf8Path::new("/p/Cargo.toml"),
            manifest,
        )
        .expect("manifest");
        assert_eq!(ctx.name, "billing");
        assert_eq!(ctx.version, "1.4.0");
        assert_eq!(ctx.description, "Billing service");
    }

    #[rstest]
    fn tolerates_workspace_inherited_fields() {
        let manifest = "[package]\nname = \"svc\"\nversion.workspace = true\n";
        let ctx = ProjectContext::from_manifest(
            Utf8Path::new("/p"),
            Utf8Path::new("/p/Cargo.toml"),
            manifest,
        )
        .expect("manifest");
        assert_eq!(ctx.name, "svc");
        assert_eq!(ctx.version, "");
    }

    #[rstest]
    #[case::virtual_manifest("[workspace]\nmembers = []\n")]
    #[case::not_toml("[package")]
    fn rejects_non_package_manifests(#[case] manifest: &str) {
        let err = ProjectContext::from_manifest(
            Utf8Path::new("/p"),
            Utf8Path::new("/p/Cargo.toml"),
            manifest,
        )
        .expect_err("invalid manifest");
        assert!(matches!(err, EnvgenError::Manifest { .. }));
    }
}
