//! Jsir Compiler Driver Library
//!
//! Orchestrates one compilation: validate arguments, discover sources,
//! resolve libraries, run the backend, then write the output module and
//! (optionally) a library artifact for downstream compilations.

pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sources;

pub use artifact::{library_artifact_path, ArtifactWriter, LIBRARY_ARTIFACT_SUFFIX};
pub use config::{CompilerArguments, CompilerConfig};
pub use error::{ConfigError, DriverError, DriverResult, ExitStatus};
pub use pipeline::{Compilation, Driver, Failure, Outcome, Phase};
