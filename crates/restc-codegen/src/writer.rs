//! # Output Writer
//!
//! A unit reaches disk in one step: the contents go to a temporary file in
//! the destination directory, which is then renamed over `<stem>.hh`. A
//! failure before the rename leaves the previous file (or no file) in place.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CodegenError;

/// Extension of generated headers.
pub const OUTPUT_EXTENSION: &str = "hh";

/// `<stem>.hh` next to `source`, or inside `out_dir` when given.
pub fn output_path(source: &Path, out_dir: Option<&Path>) -> Result<PathBuf, CodegenError> {
    let file_name = source
        .file_name()
        .map(Path::new)
        .filter(|name| name.file_stem().is_some_and(|stem| !stem.is_empty()))
        .ok_or_else(|| CodegenError::SourcePath {
            path: source.to_path_buf(),
        })?
        .with_extension(OUTPUT_EXTENSION);
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(file_name))
}

/// Atomically replace `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let io_error = |source: std::io::Error| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(contents.as_bytes()).map_err(io_error)?;
    tmp.flush().map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;
    tracing::trace!(path = %path.display(), bytes = contents.len(), "persisted output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_next_to_source() {
        let path = output_path(Path::new("schemas/vtn.ini"), None).unwrap();
        assert_eq!(path, PathBuf::from("schemas/vtn.hh"));
        let bare = output_path(Path::new("vtn.ini"), None).unwrap();
        assert_eq!(bare, PathBuf::from("vtn.hh"));
    }

    #[test]
    fn output_dir_overrides_location() {
        let path = output_path(Path::new("schemas/vbr.ini"), Some(Path::new("gen"))).unwrap();
        assert_eq!(path, PathBuf::from("gen/vbr.hh"));
    }

    #[test]
    fn source_without_name_is_rejected() {
        assert!(matches!(
            output_path(Path::new("/"), None),
            Err(CodegenError::SourcePath { .. })
        ));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vtn.hh");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, "new\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("vtn.hh");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
        assert!(!path.exists());
    }
}
