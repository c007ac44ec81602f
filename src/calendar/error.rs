use std::path::PathBuf;

use thiserror::Error;

/// Failures of the event document.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid event document: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not encode events: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// Load failures must stop startup; an empty store would overwrite the
    /// existing document on the first save.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Parse { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
