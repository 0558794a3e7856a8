//! Jsir Code Generation
//!
//! The [`Backend`] trait is the seam between the driver and the IR
//! lowering/JavaScript emission engine. The driver resolves sources and
//! libraries, then calls into a backend exactly once per artifact.
//!
//! [`JsBackend`] is the bundled implementation: it wraps source text into a
//! module of the configured kind and serializes library artifacts that
//! later compilations can depend on.

mod config;
mod error;
mod js;

pub use config::{BackendConfig, EcmaVersion, MainCall, ModuleKind, SourceMapConfig, SourceMapEmbedding};
pub use error::{BackendError, BackendResult};
pub use js::{js_identifier, JsBackend, LibraryMetadata};

use std::path::{Path, PathBuf};

use jsir_library::LibraryReference;

/// Lowering and emission entry points used by the driver.
///
/// `immediate` and `all` mirror the split between direct and transitive
/// dependencies; the driver currently passes the same list for both.
pub trait Backend {
    /// Compile `sources` into the text of one output module.
    fn compile(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        all: &[LibraryReference],
    ) -> BackendResult<String>;

    /// Serialize `sources` as a reusable library at `output`.
    fn generate_library(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        all: &[LibraryReference],
        output: &Path,
    ) -> BackendResult<()>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn compile(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        all: &[LibraryReference],
    ) -> BackendResult<String> {
        (**self).compile(sources, config, immediate, all)
    }

    fn generate_library(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        all: &[LibraryReference],
        output: &Path,
    ) -> BackendResult<()> {
        (**self).generate_library(sources, config, immediate, all, output)
    }
}
