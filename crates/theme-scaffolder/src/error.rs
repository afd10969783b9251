//! Error type shared by every scaffolding step

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures of a scaffolding run.
///
/// None of these are retried: they are reported to the operator and the run
/// stops. The namespace prompt loop is the only place user input is asked for
/// again.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Folder name (or other user input) is empty or unusable
    #[error("{0}")]
    Validation(String),

    /// The theme's install directory is already present
    #[error("Theme already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Boilerplate archive could not be fetched, or the marker file is missing
    #[error("Couldn't download starter theme files from {url}: {reason}")]
    Download { url: String, reason: String },

    /// composer.json could not be read, parsed, or written back
    #[error("Failed to update {}: {message}", path.display())]
    ManifestWrite { path: PathBuf, message: String },

    /// The Composer project itself is unusable (no composer.json, bad JSON)
    #[error("{0}")]
    Host(String),

    /// Filesystem failure while copying or rewriting theme files
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal interaction failed or the prompt was cancelled
    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn download(url: impl ToString, reason: impl ToString) -> Self {
        Self::Download {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn manifest(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ManifestWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
