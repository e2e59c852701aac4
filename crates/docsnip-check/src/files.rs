// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Find the documents to check.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

/// Collect markdown files under `path`, sorted.
///
/// A file named directly is taken as-is, whatever its extension.
pub fn collect_markdown_files(path: &Path) -> Result<Vec<PathBuf>, CheckError> {
    if fs::metadata(path).map_err(io_error(path))?.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error(path))? {
        let entry = entry.map_err(io_error(path))?;
        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(io_error(&entry_path))?;
        if file_type.is_dir() {
            files.extend(collect_markdown_files(&entry_path)?);
        } else if is_markdown(&entry_path) {
            // Symlinks are not descended into, but a linked document must resolve.
            if file_type.is_symlink() {
                fs::metadata(&entry_path).map_err(io_error(&entry_path))?;
            }
            files.push(entry_path);
        }
    }

    files.sort();
    Ok(files)
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> CheckError + '_ {
    move |source| CheckError::Io { path: path.to_path_buf(), source }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("guide").join("intro.md"), "").unwrap();

        let files = collect_markdown_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "guide/intro.md"]);
    }

    #[test]
    fn single_file_is_returned_directly() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("README");
        fs::write(&file, "").unwrap();
        assert_eq!(collect_markdown_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_markdown_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_reported_against_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("guide")).unwrap();
        let link = dir.path().join("guide").join("broken.md");
        std::os::unix::fs::symlink(dir.path().join("missing.md"), &link).unwrap();

        match collect_markdown_files(dir.path()).unwrap_err() {
            CheckError::Io { path, .. } => assert_eq!(path, link),
            other => panic!("unexpected error: {other}"),
        }
    }
}
