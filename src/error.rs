//! Error types raised by the cleaners and the filesystem operation handler.

use std::path::PathBuf;

use crate::cleaners::CleanerType;

pub type Result<T, E = CleanerError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CleanerError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// `clean` was called on an item the cleaner no longer accepts.
    #[error("The item cannot be cleaned by the {cleaner} cleaner: '{}'", path.display())]
    InvalidOperation { cleaner: CleanerType, path: PathBuf },

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Invalid shortcut path syntax: {0}")]
    InvalidShortcutSyntax(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CleanerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanerError::Io {
            path: path.into(),
            source,
        }
    }
}
