//! Backend configuration

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Module wrapper emitted around the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Global variable assignment
    #[default]
    Plain,
    /// `require` / `module.exports`
    #[serde(rename = "commonjs")]
    CommonJs,
    /// `define([...], factory)`
    Amd,
    /// Universal module definition
    Umd,
}

impl ModuleKind {
    pub fn name(self) -> &'static str {
        match self {
            ModuleKind::Plain => "plain",
            ModuleKind::CommonJs => "commonjs",
            ModuleKind::Amd => "amd",
            ModuleKind::Umd => "umd",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ECMAScript edition of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcmaVersion {
    #[default]
    V5,
}

/// Whether the emitted module invokes `main` once loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainCall {
    #[default]
    Call,
    NoCall,
}

/// How source contents are embedded into source maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapEmbedding {
    Always,
    Never,
    #[default]
    Inlining,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapConfig {
    pub enabled: bool,
    pub prefix: Option<String>,
    pub base_dirs: Vec<PathBuf>,
    pub embed_sources: SourceMapEmbedding,
}

/// Everything the backend needs besides sources and libraries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    /// Name of the produced module, taken from the output file stem
    pub module_name: String,
    pub module_kind: ModuleKind,
    pub target: EcmaVersion,
    pub main_call: MainCall,
    pub source_map: SourceMapConfig,
    pub typed_arrays: bool,
    /// Modules whose internal declarations are visible to this one
    pub friend_paths: Vec<PathBuf>,
    /// Canonical directory the output file is written to
    pub output_dir: PathBuf,
    /// Library artifact emission was requested
    pub meta_info: bool,
}
