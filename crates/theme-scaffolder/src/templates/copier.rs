//! Copying the cached boilerplate into the theme directory

use crate::error::{Result, ScaffoldError};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// What [`copy_tree`] created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub directories: usize,
}

/// Recursively copy `source` into `destination`, creating `destination` (and
/// its parents) first. Directories are visited before their contents, so each
/// file's parent exists by the time it is copied. Symlinks are skipped.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<CopySummary> {
    fs::create_dir_all(destination).map_err(|e| ScaffoldError::io(destination, e))?;

    let mut summary = CopySummary::default();

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            ScaffoldError::io(path, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ScaffoldError::io(&target, e))?;
            summary.directories += 1;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|e| ScaffoldError::io(&target, e))?;
            summary.files += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative_entries(root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            if entry.file_type().is_dir() {
                dirs.push(relative);
            } else {
                files.push(relative);
            }
        }
        (files, dirs)
    }

    #[test]
    fn test_copy_preserves_structure_and_content() {
        let src = tempfile::tempdir().unwrap();
        write(src.path(), "index.php", b"<?php // index");
        write(src.path(), "style.css", b"/* Theme Name: x */");
        write(src.path(), "inc/Framework.php", b"<?php namespace BEA\\Theme\\Framework;");
        write(src.path(), "inc/Services/Assets.php", b"<?php");
        write(src.path(), "dist/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]);
        fs::create_dir_all(src.path().join("languages")).unwrap();

        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("web/app/themes/acme");

        let summary = copy_tree(src.path(), &target).unwrap();

        let (src_files, src_dirs) = relative_entries(src.path());
        let (dest_files, dest_dirs) = relative_entries(&target);
        assert_eq!(summary.files, 5);
        assert_eq!(summary.directories, 4);
        assert_eq!(src_files, dest_files);
        assert_eq!(src_dirs, dest_dirs);

        for file in &src_files {
            assert_eq!(
                fs::read(src.path().join(file)).unwrap(),
                fs::read(target.join(file)).unwrap(),
                "content differs for {}",
                file.display()
            );
        }
    }

    #[test]
    fn test_copy_empty_source_creates_destination() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("theme");

        let summary = copy_tree(src.path(), &target).unwrap();

        assert_eq!(summary, CopySummary::default());
        assert!(target.is_dir());
    }

    #[test]
    fn test_copy_missing_source_is_io_error() {
        let dest = tempfile::tempdir().unwrap();
        let err = copy_tree(&dest.path().join("missing"), &dest.path().join("theme")).unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
    }
}
