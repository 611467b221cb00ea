//! Filesystem helpers shared across `cargo-envgen` modules.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::{ErrorKind, Write};

use crate::error::EnvgenError;

/// Opens a directory if it exists, returning `None` when the path is missing.
pub fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, EnvgenError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(EnvgenError::io(path, err)),
    }
}

/// Opens `path`, creating it and any missing parents first.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir, EnvgenError> {
    if let Some(dir) = open_optional_dir(path)? {
        return Ok(dir);
    }
    Dir::create_ambient_dir_all(path, ambient_authority())
        .map_err(|io_err| EnvgenError::io(path, io_err))?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|io_err| EnvgenError::io(path, io_err))
}

/// Replaces the file at `path` with `content`, creating parent directories.
pub fn write_file(path: &Utf8Path, content: &str) -> Result<Utf8PathBuf, EnvgenError> {
    let (parent, file_name) = split_path(path)?;
    let dir = ensure_dir(parent)?;
    let mut file = dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|io_err| EnvgenError::io(path, io_err))?;
    file.write_all(content.as_bytes())
        .map_err(|io_err| EnvgenError::io(path, io_err))?;
    Ok(path.to_path_buf())
}

/// Reads a UTF-8 file into memory.
pub fn read_file(path: &Utf8Path) -> Result<String, EnvgenError> {
    let (parent, file_name) = split_path(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|io_err| EnvgenError::io(path, io_err))?;
    dir.read_to_string(file_name)
        .map_err(|io_err| EnvgenError::io(path, io_err))
}

/// Removes the file at `path`.
///
/// Returns `false` when there was nothing to remove.
pub fn remove_file_if_exists(path: &Utf8Path) -> Result<bool, EnvgenError> {
    let (parent, file_name) = split_path(path)?;
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(false);
    };
    match dir.remove_file(file_name) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(EnvgenError::io(path, err)),
    }
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), EnvgenError> {
    let file_name = path.file_name().ok_or_else(|| {
        EnvgenError::io(
            path,
            std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((parent, file_name))
}

#[cfg(test)]
mod tests {
    //! Tests for filesystem helpers.

    use super::*;
    use rstest::rstest;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let tempdir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .expect("tempdir path is UTF-8");
        (tempdir, root)
    }

    #[rstest]
    fn write_file_creates_missing_parents() {
        let (_guard, root) = temp_root();
        let target = root.join("a/b/c.txt");

        write_file(&target, "first").expect("write file");
        write_file(&target, "second").expect("overwrite file");

        assert_eq!(read_file(&target).expect("read back"), "second");
    }

    #[rstest]
    #[case::parent_is_a_file("blocker/child.txt")]
    #[case::target_is_a_dir("blocker-dir")]
    fn write_file_reports_io_errors_with_the_target_path(#[case] relative: &str) {
        let (_guard, root) = temp_root();
        write_file(&root.join("blocker"), "not a directory").expect("write blocker");
        ensure_dir(&root.join("blocker-dir")).expect("create blocking dir");
        let target = root.join(relative);

        let err = write_file(&target, "content").expect_err("write should fail");

        match err {
            EnvgenError::Io { path, .. } => assert!(target.starts_with(&path)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn remove_reports_whether_a_file_was_deleted() {
        let (_guard, root) = temp_root();
        let target = root.join("gone.txt");
        write_file(&target, "x").expect("write file");

        assert!(remove_file_if_exists(&target).expect("first removal"));
        assert!(!remove_file_if_exists(&target).expect("second removal"));
        assert!(!remove_file_if_exists(&root.join("missing/dir/file.txt")).expect("missing dir"));
    }
}
