//! Temporary Cargo project trees for generator tests.
//!
//! # Examples
//!
//! ```
//! use envgen_test_helpers::TempProject;
//!
//! let project = TempProject::new("demo").expect("create project");
//! project.write("src/lib.rs", "pub struct Empty;").expect("write source");
//! assert!(project.exists("Cargo.toml"));
//! ```

use std::io::ErrorKind;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tempfile::TempDir;

/// A Cargo package in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct TempProject {
    root: Utf8PathBuf,
    dir: Dir,
    _tempdir: TempDir,
}

impl TempProject {
    /// Creates a project containing a minimal `Cargo.toml` for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created or is
    /// not valid UTF-8.
    pub fn new(name: &str) -> Result<Self> {
        let tempdir = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .map_err(|path| anyhow!("temp dir is not valid UTF-8: {}", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).context("open temp dir")?;
        let project = Self {
            root,
            dir,
            _tempdir: tempdir,
        };
        project.write(
            "Cargo.toml",
            &format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2024\"\n"),
        )?;
        Ok(project)
    }

    /// Absolute path of the project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` inside the project.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Writes `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        if let Some(parent) = Utf8Path::new(relative).parent()
            && !parent.as_str().is_empty()
        {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.dir
            .write(relative, contents)
            .with_context(|| format!("write {relative}"))
    }

    /// Reads `relative` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    pub fn read(&self, relative: &str) -> Result<String> {
        self.dir
            .read_to_string(relative)
            .with_context(|| format!("read {relative}"))
    }

    /// Deletes `relative`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(&self, relative: &str) -> Result<()> {
        match self.dir.remove_file(relative) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {relative}")),
        }
    }

    /// Returns `true` when `relative` exists.
    #[must_use]
    pub fn exists(&self, relative: &str) -> bool {
        self.dir.exists(relative)
    }
}
