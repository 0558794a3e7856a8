//! Compilation pipeline
//!
//! One run moves through a fixed sequence of phases:
//!
//! ```text
//! Init → ArgsValidated → SourcesDiscovered → DependenciesResolved
//!      → Compiled → ArtifactsWritten → Done
//! ```
//!
//! Any error moves the run to `Failed`. Nothing from the failing phase is
//! kept, but artifacts from earlier phases are not rolled back.

use std::fmt;
use std::path::PathBuf;

use jsir_codegen::{Backend, BackendConfig};
use jsir_library::{resolve_libraries, LibraryReference};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::artifact::ArtifactWriter;
use crate::config::{CompilerArguments, CompilerConfig};
use crate::error::{ConfigError, DriverError, DriverResult, ExitStatus};
use crate::sources::discover_sources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    ArgsValidated,
    SourcesDiscovered,
    DependenciesResolved,
    Compiled,
    ArtifactsWritten,
    Done,
    Failed,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::ArgsValidated => "args_validated",
            Phase::SourcesDiscovered => "sources_discovered",
            Phase::DependenciesResolved => "dependencies_resolved",
            Phase::Compiled => "compiled",
            Phase::ArtifactsWritten => "artifacts_written",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a successful run
#[derive(Debug)]
pub enum Outcome {
    /// Version request without sources; nothing was compiled
    VersionOnly,
    Compiled(Compilation),
}

impl Outcome {
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::Ok
    }
}

#[derive(Debug)]
pub struct Compilation {
    pub output: PathBuf,
    pub library_artifact: Option<PathBuf>,
    pub sources: Vec<PathBuf>,
    /// Resolved libraries in input order.
    ///
    /// Libraries unpacked from archives point into extraction directories
    /// that are deleted when the run ends, unless they were kept with
    /// `keep_extracted` (then they are listed in `extracted`). Use
    /// [`Compilation::live_libraries`] to get only the ones still on disk.
    pub libraries: Vec<LibraryReference>,
    /// Archive extraction directories kept on request
    pub extracted: Vec<PathBuf>,
}

impl Compilation {
    /// Libraries whose directories still exist after the run
    pub fn live_libraries(&self) -> impl Iterator<Item = &LibraryReference> {
        self.libraries.iter().filter(|library| library.directory().is_dir())
    }
}

/// A failed run and the last phase it completed
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Failure {
    pub failed_after: Phase,
    #[source]
    pub error: DriverError,
}

impl Failure {
    pub fn exit_status(&self) -> ExitStatus {
        self.error.exit_status()
    }
}

struct Progress {
    phase: Phase,
}

impl Progress {
    fn new() -> Self {
        Self { phase: Phase::Init }
    }

    fn advance(&mut self, next: Phase) {
        debug!(from = %self.phase, to = %next, "phase complete");
        self.phase = next;
    }

    fn fail(&mut self, error: DriverError) -> Failure {
        let failed_after = self.phase;
        self.phase = Phase::Failed;
        debug!(after = %failed_after, kind = error.kind(), "compilation failed");
        Failure {
            failed_after,
            error,
        }
    }
}

/// Drives one compilation against a backend
pub struct Driver<B> {
    backend: B,
}

impl<B: Backend> Driver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[instrument(skip_all, fields(output = ?args.output))]
    pub fn run(&self, args: &CompilerArguments) -> Result<Outcome, Failure> {
        let mut progress = Progress::new();
        self.run_phases(args, &mut progress)
            .map_err(|error| progress.fail(error))
    }

    fn run_phases(&self, args: &CompilerArguments, progress: &mut Progress) -> DriverResult<Outcome> {
        if args.sources.is_empty() && !args.incremental && args.version {
            return Ok(Outcome::VersionOnly);
        }
        debug!(sources = ?args.sources, libraries = ?args.libraries, "arguments");

        let config = CompilerConfig::from_arguments(args)?;
        progress.advance(Phase::ArgsValidated);

        let sources = discover_sources(&config.sources)?;
        if sources.is_empty() && !config.incremental {
            return Err(ConfigError::NoSourceFiles.into());
        }
        if config.verbose {
            let names: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            info!("Compiling source files: {}", names.join(", "));
        }
        let writer = ArtifactWriter::new(&config.output)?;
        progress.advance(Phase::SourcesDiscovered);

        let mut dependencies = resolve_libraries(&config.libraries)?;
        progress.advance(Phase::DependenciesResolved);

        let backend_config = BackendConfig {
            module_name: config.module_name(),
            module_kind: config.module_kind,
            target: config.target,
            main_call: config.main_call,
            source_map: config.source_map.clone(),
            typed_arrays: config.typed_arrays,
            friend_paths: config.friend_paths.clone(),
            output_dir: writer.output_dir().to_path_buf(),
            meta_info: config.meta_info,
        };
        let libraries = dependencies.libraries();
        let module = self
            .backend
            .compile(&sources, &backend_config, libraries, libraries)?;
        progress.advance(Phase::Compiled);

        let library = config
            .meta_info
            .then_some((&self.backend, sources.as_slice(), &backend_config, libraries));
        let library_artifact = writer.write_artifacts(&module, library)?;
        progress.advance(Phase::ArtifactsWritten);

        let libraries = libraries.to_vec();
        let extracted = if config.keep_extracted {
            let kept = dependencies.persist_extracted();
            for dir in &kept {
                info!(dir = %dir.display(), "keeping extracted library");
            }
            kept
        } else {
            Vec::new()
        };
        progress.advance(Phase::Done);

        Ok(Outcome::Compiled(Compilation {
            output: writer.output().to_path_buf(),
            library_artifact,
            sources,
            libraries,
            extracted,
        }))
    }
}
