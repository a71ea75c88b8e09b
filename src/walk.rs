//! Listing the files of a directory tree for comparison.

use error_set::error_set;
use log::trace;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

error_set! {
    /// Errors from enumerating a directory
    WalkError := {
        /// The directory or one of its entries could not be read
        #[display("listing {dir}: {source}")]
        List(walkdir::Error) { dir: String },
        /// An entry did not lie below the listed directory
        #[display("listing {dir}: {source}")]
        Outside(std::path::StripPrefixError) { dir: String },
    }
}

/// List the files below `root` as paths relative to it, sorted by name.
///
/// Without `recursive` only the direct children of `root` are considered.
/// Directories themselves are never listed.
///
/// # Errors
///
/// Returns [`WalkError::List`] when `root` or an entry below it cannot be
/// read.
pub fn list_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, WalkError> {
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| WalkError::List {
            source,
            dir: root.display().to_string(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|source| WalkError::Outside {
                source,
                dir: root.display().to_string(),
            })?;
        trace!("listed {}", relative.display());
        files.push(relative.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in [
            ("shared.txt", "shared\n"),
            ("only_in_dir1.txt", "only\n"),
            ("src/models/user.go", "package models\n"),
            ("src/main.go", "package main\n"),
        ] {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn flat_listing_skips_subdirectories() {
        let dir = tree();
        let files = list_files(dir.path(), false).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("only_in_dir1.txt"), PathBuf::from("shared.txt")]
        );
    }

    #[test]
    fn recursive_listing_includes_nested_files() {
        let dir = tree();
        let files = list_files(dir.path(), true).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("only_in_dir1.txt"),
                PathBuf::from("shared.txt"),
                Path::new("src").join("main.go"),
                Path::new("src").join("models").join("user.go"),
            ]
        );
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(list_files(dir.path(), true).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = list_files(&dir.path().join("absent"), false);
        assert!(matches!(result, Err(WalkError::List { .. })));
    }
}
