//! Error types for library resolution

use std::io;
use thiserror::Error;

/// Result type alias for library resolution
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Failure to turn one `--libraries` entry into a library reference.
///
/// Every variant carries the entry exactly as the user wrote it so the
/// driver can point at it.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// The entry did not resolve to a directory
    #[error("library {library} must be a directory")]
    NotADirectory { library: String },

    /// The library directory has no children
    #[error("library {library} directory is empty")]
    Empty { library: String },

    /// No `.meta` descriptor among the library's children
    #[error("couldn't find metadata file (.{extension}) for library: {library}")]
    MissingMetadata {
        library: String,
        extension: &'static str,
    },

    /// The archive has no directory entry ending in the library-root suffix
    #[error("library archive {library} has no `*{marker}` directory")]
    MissingLibraryRoot {
        library: String,
        marker: &'static str,
    },

    /// An archive entry would land outside the extraction directory
    #[error("library archive {library} contains unsafe entry `{entry}`")]
    UnsafeEntry { library: String, entry: String },

    /// Filesystem or archive read failure
    #[error("failed to {action} for library {library}: {source}")]
    Io {
        library: String,
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl LibraryError {
    pub(crate) fn io(library: &str, action: &'static str, source: io::Error) -> Self {
        LibraryError::Io {
            library: library.to_string(),
            action,
            source,
        }
    }

    /// The `--libraries` entry this error is about.
    pub fn library(&self) -> &str {
        match self {
            LibraryError::NotADirectory { library }
            | LibraryError::Empty { library }
            | LibraryError::MissingMetadata { library, .. }
            | LibraryError::MissingLibraryRoot { library, .. }
            | LibraryError::UnsafeEntry { library, .. }
            | LibraryError::Io { library, .. } => library,
        }
    }

    /// Whether the library itself is broken, as opposed to the filesystem
    /// failing underneath it.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, LibraryError::Io { .. })
    }
}
