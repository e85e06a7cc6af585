//! Error kinds shared by every component.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("document not found: {}", .0.display())]
    DocumentMissing(PathBuf),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("document structure not recognised: {0}")]
    PatternMismatch(String),

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The console reached end of input.
    #[error("input closed")]
    InputClosed,

    #[error("console i/o failed: {0}")]
    Console(#[from] std::io::Error),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Errors that end the current action but leave the menu loop running.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EntryNotFound(_)
                | Error::PatternMismatch(_)
                | Error::InvalidIndex(_)
                | Error::InvalidInput(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
