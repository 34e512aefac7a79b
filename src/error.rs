use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenameError>;

/// Errors produced while configuring or running a rename batch
#[derive(Debug, Error)]
pub enum RenameError {
    /// A required path flag was missing or blank
    #[error("{flag} path must not be blank")]
    BlankPath { flag: &'static str },
    /// A root directory could not be listed; fatal for the whole run
    #[error("failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Something already lives at the destination
    #[error("destination {path:?} already exists")]
    DestinationExists { path: PathBuf },
    /// Normalization left nothing to name the folder with
    #[error("'{original}' normalizes to an empty name")]
    EmptyTargetName { original: String },
    /// The move itself failed
    #[error("failed to rename {from:?} to {to:?}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenameError {
    #[must_use]
    pub fn read_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stops the whole batch rather than a single entry
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BlankPath { .. } | Self::ReadDir { .. })
    }
}
