//! Output artifacts: the compiled module and the optional library package

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use jsir_codegen::{Backend, BackendConfig};
use jsir_library::{LibraryReference, LIBRARY_ROOT_SUFFIX};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, DriverError, DriverResult};

/// Appended to the output path to name the library artifact
pub const LIBRARY_ARTIFACT_SUFFIX: &str = LIBRARY_ROOT_SUFFIX;

/// Path of the library artifact that belongs to `output`
pub fn library_artifact_path(output: &Path) -> PathBuf {
    let mut path = OsString::from(output.as_os_str());
    path.push(LIBRARY_ARTIFACT_SUFFIX);
    PathBuf::from(path)
}

/// Writes the artifacts of one compilation under a resolved output directory
#[derive(Debug)]
pub struct ArtifactWriter {
    output: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Resolve the output directory to a canonical, existing directory.
    pub fn new(output: &Path) -> DriverResult<Self> {
        let file_name = output.file_name().ok_or_else(|| ConfigError::InvalidOutput {
            path: output.to_path_buf(),
        })?;
        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let output_dir = parent
            .canonicalize()
            .map_err(|e| DriverError::io("could not resolve output directory", e))?;

        Ok(Self {
            output: output_dir.join(file_name),
            output_dir,
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn library_artifact(&self) -> PathBuf {
        library_artifact_path(&self.output)
    }

    /// Stage the module text next to the output without touching it.
    ///
    /// The output is only replaced once [`StagedModule::commit`] is called;
    /// dropping the staged module leaves the previous output in place.
    pub fn stage_module(&self, text: &str) -> DriverResult<StagedModule> {
        let write_err = |e| {
            DriverError::io(format!("failed to write output {}", self.output.display()), e)
        };
        let mut file = NamedTempFile::new_in(&self.output_dir).map_err(write_err)?;
        file.write_all(text.as_bytes()).map_err(write_err)?;
        Ok(StagedModule {
            file,
            output: self.output.clone(),
            bytes: text.len(),
        })
    }

    /// Ask the backend to serialize the compilation as a library.
    pub fn write_library<B: Backend>(
        &self,
        backend: &B,
        sources: &[PathBuf],
        config: &BackendConfig,
        dependencies: &[LibraryReference],
    ) -> DriverResult<PathBuf> {
        let path = self.library_artifact();
        backend.generate_library(sources, config, dependencies, dependencies, &path)?;
        Ok(path)
    }

    /// Write the module and, when requested, the library artifact.
    ///
    /// Either both land or neither does: a failed library step removes
    /// whatever the backend left at the artifact path and never replaces
    /// the output.
    pub fn write_artifacts<B: Backend>(
        &self,
        module: &str,
        library: Option<(&B, &[PathBuf], &BackendConfig, &[LibraryReference])>,
    ) -> DriverResult<Option<PathBuf>> {
        let staged = self.stage_module(module)?;

        let artifact = match library {
            Some((backend, sources, config, dependencies)) => {
                match self.write_library(backend, sources, config, dependencies) {
                    Ok(path) => Some(path),
                    Err(err) => {
                        self.discard_library();
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        if let Err(err) = staged.commit() {
            if artifact.is_some() {
                self.discard_library();
            }
            return Err(err);
        }
        Ok(artifact)
    }

    fn discard_library(&self) {
        let path = self.library_artifact();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else if path.exists() {
            fs::remove_file(&path)
        } else {
            return;
        };
        match removed {
            Ok(()) => debug!(library = %path.display(), "partial library removed"),
            Err(e) => warn!(library = %path.display(), error = %e, "could not remove partial library"),
        }
    }
}

/// Module text waiting in a temporary file beside the output
#[derive(Debug)]
pub struct StagedModule {
    file: NamedTempFile,
    output: PathBuf,
    bytes: usize,
}

impl StagedModule {
    /// Move the staged text over the output, replacing any previous output.
    pub fn commit(self) -> DriverResult<()> {
        let output = self.output;
        self.file.persist(&output).map_err(|e| {
            DriverError::io(format!("failed to write output {}", output.display()), e.error)
        })?;
        info!(output = %output.display(), bytes = self.bytes, "output written");
        Ok(())
    }
}
