//! Error types for code generation

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write library artifact {path}: {source}")]
    LibraryWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize library metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Errors produced while checking or lowering the program
    #[error("{} error(s) reported during compilation", .0.len())]
    Reported(Vec<String>),
}

impl BackendError {
    /// Individual messages, one per reported problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            BackendError::Reported(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
