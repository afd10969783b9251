//! Placeholder replacement across the copied theme

use crate::error::{Result, ScaffoldError};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Selects the files a rewrite pass touches
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Matches any file whose path below the root contains this substring
    /// (case-insensitive)
    pub extension: Option<String>,
    /// Matches files with exactly one of these names, wherever they live
    pub file_names: Vec<String>,
}

impl FileFilter {
    /// Code files (by extension substring) plus the named files
    pub fn code_and(extension: &str, file_names: &[&str]) -> Self {
        Self {
            extension: Some(extension.to_lowercase()),
            file_names: file_names.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn matches(&self, relative_path: &Path) -> bool {
        let by_extension = self.extension.as_deref().is_some_and(|extension| {
            relative_path
                .to_string_lossy()
                .to_lowercase()
                .contains(extension)
        });
        let by_name = relative_path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.file_names.iter().any(|wanted| wanted == name));
        by_extension || by_name
    }
}

/// Replace every literal occurrence of `search` with `replace` in the files
/// under `root` selected by `filter`. Returns how many files changed.
///
/// Files that are not valid UTF-8 are left alone. Nothing is written for
/// files without a match, so running the same pass twice is a no-op as long
/// as `replace` does not contain `search`.
pub fn rewrite_tokens(root: &Path, search: &str, replace: &str, filter: &FileFilter) -> Result<usize> {
    if search.is_empty() {
        return Ok(0);
    }

    let mut changed = 0;
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScaffoldError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if filter.matches(relative) && rewrite_file(entry.path(), search, replace)? {
            changed += 1;
        }
    }

    Ok(changed)
}

/// Literal replacement inside a single file; `true` when the file changed
pub fn rewrite_file(path: &Path, search: &str, replace: &str) -> Result<bool> {
    if search.is_empty() {
        return Ok(false);
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => return Ok(false),
        Err(e) => return Err(ScaffoldError::io(path, e)),
    };

    if !content.contains(search) {
        return Ok(false);
    }

    fs::write(path, content.replace(search, replace)).map_err(|e| ScaffoldError::io(path, e))?;
    Ok(true)
}
