//! Driver error taxonomy
//!
//! Every failure of a compilation run falls into one of four kinds. The
//! kinds are a closed enum so reporting and exit-code mapping are
//! exhaustive matches.

use std::io;
use std::path::PathBuf;
use std::process;

use jsir_codegen::BackendError;
use jsir_library::LibraryError;
use thiserror::Error;

pub type DriverResult<T> = Result<T, DriverError>;

/// Process exit status of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok,
    CompilationError,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::CompilationError => 1,
        }
    }
}

impl From<ExitStatus> for process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        process::ExitCode::from(status.code())
    }
}

/// A user-facing configuration problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("specify at least one source file or directory")]
    NoSourceArguments,

    #[error("specify output file via --output")]
    MissingOutput,

    #[error("output path {path} does not name a file")]
    InvalidOutput { path: PathBuf },

    #[error("source file or directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("no source files")]
    NoSourceFiles,

    #[error("unknown module kind: {value}. Valid values are: {valid}")]
    UnknownModuleKind { value: String, valid: String },

    #[error("unknown source map source embedding mode: {value}. Valid values are: {valid}")]
    UnknownSourceMapEmbedding { value: String, valid: String },

    #[error("unsupported ECMA version: {value}")]
    UnsupportedTarget { value: String },
}

/// Failure of a compilation run
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("{}", join_messages(.0))]
    Configuration(Vec<ConfigError>),

    #[error(transparent)]
    MalformedLibrary(LibraryError),

    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

fn join_messages(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DriverError {
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        DriverError::Io {
            message: message.into(),
            source,
        }
    }

    /// Short name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            DriverError::Configuration(_) => "configuration error",
            DriverError::MalformedLibrary(_) => "malformed library",
            DriverError::Io { .. } => "I/O failure",
            DriverError::Backend(_) => "backend failure",
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            DriverError::Configuration(_)
            | DriverError::MalformedLibrary(_)
            | DriverError::Io { .. }
            | DriverError::Backend(_) => ExitStatus::CompilationError,
        }
    }
}

impl From<ConfigError> for DriverError {
    fn from(error: ConfigError) -> Self {
        DriverError::Configuration(vec![error])
    }
}

impl From<LibraryError> for DriverError {
    fn from(error: LibraryError) -> Self {
        match error {
            LibraryError::Io {
                library,
                action,
                source,
            } => DriverError::Io {
                message: format!("failed to {action} for library {library}"),
                source,
            },
            malformed => DriverError::MalformedLibrary(malformed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_errors_are_split_by_kind() {
        let malformed: DriverError = LibraryError::Empty {
            library: "libs/empty".to_string(),
        }
        .into();
        assert!(matches!(malformed, DriverError::MalformedLibrary(_)));
        assert_eq!(malformed.to_string(), "library libs/empty directory is empty");

        let io: DriverError = LibraryError::Io {
            library: "libs/a.zip".to_string(),
            action: "read archive",
            source: io::Error::new(io::ErrorKind::InvalidData, "bad header"),
        }
        .into();
        assert!(matches!(io, DriverError::Io { .. }));
        assert_eq!(io.to_string(), "failed to read archive for library libs/a.zip: bad header");
    }

    #[test]
    fn test_configuration_errors_join() {
        let err = DriverError::Configuration(vec![
            ConfigError::NoSourceArguments,
            ConfigError::MissingOutput,
        ]);
        assert_eq!(
            err.to_string(),
            "specify at least one source file or directory; specify output file via --output"
        );
        assert_eq!(err.exit_status(), ExitStatus::CompilationError);
        assert_eq!(ExitStatus::Ok.code(), 0);
    }
}
