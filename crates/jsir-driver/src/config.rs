//! Compiler arguments and their validation
//!
//! [`CompilerArguments`] is the parsed command line as plain data.
//! [`CompilerConfig::from_arguments`] checks it against the fixed option
//! tables and reports every problem at once.

use std::path::{Path, PathBuf};

use jsir_codegen::{EcmaVersion, MainCall, ModuleKind, SourceMapConfig, SourceMapEmbedding};
use jsir_library::{parse_library_list, without_legacy_runtime};
use tracing::warn;

use crate::error::{ConfigError, DriverError, DriverResult};

pub const MODULE_KINDS: [(&str, ModuleKind); 4] = [
    ("plain", ModuleKind::Plain),
    ("commonjs", ModuleKind::CommonJs),
    ("amd", ModuleKind::Amd),
    ("umd", ModuleKind::Umd),
];

pub const SOURCE_MAP_EMBEDDINGS: [(&str, SourceMapEmbedding); 3] = [
    ("always", SourceMapEmbedding::Always),
    ("never", SourceMapEmbedding::Never),
    ("inlining", SourceMapEmbedding::Inlining),
];

pub const ECMA_VERSIONS: [(&str, EcmaVersion); 1] = [("v5", EcmaVersion::V5)];

/// Value of `--main` that suppresses the call to `main`
pub const NO_CALL: &str = "noCall";

/// Raw compiler arguments, as produced by the command-line layer
#[derive(Debug, Clone, Default)]
pub struct CompilerArguments {
    /// Source files and directories
    pub sources: Vec<String>,
    /// Separator-delimited library list
    pub libraries: Option<String>,
    pub output: Option<PathBuf>,
    /// Also emit a library artifact next to the output
    pub meta_info: bool,
    pub module_kind: Option<String>,
    pub target: Option<String>,
    pub main: Option<String>,
    pub source_map: bool,
    pub source_map_prefix: Option<String>,
    pub source_map_base_dirs: Option<String>,
    pub source_map_embed_sources: Option<String>,
    pub friend_modules: Option<String>,
    pub friend_modules_disabled: bool,
    pub typed_arrays: bool,
    /// Incremental mode tolerates an empty source set
    pub incremental: bool,
    pub version: bool,
    pub verbose: bool,
    /// Keep directories extracted from library archives
    pub keep_extracted: bool,
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub sources: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub output: PathBuf,
    pub meta_info: bool,
    pub module_kind: ModuleKind,
    pub target: EcmaVersion,
    pub main_call: MainCall,
    pub source_map: SourceMapConfig,
    pub friend_paths: Vec<PathBuf>,
    pub typed_arrays: bool,
    pub incremental: bool,
    pub verbose: bool,
    pub keep_extracted: bool,
}

impl CompilerConfig {
    /// Validate arguments, collecting every configuration error.
    ///
    /// Unknown enumerated values are reported and replaced by their
    /// default so the remaining checks still run.
    pub fn from_arguments(args: &CompilerArguments) -> DriverResult<Self> {
        let mut errors = Vec::new();

        if args.sources.is_empty() && !args.incremental {
            errors.push(ConfigError::NoSourceArguments);
        }

        let output = match &args.output {
            Some(output) if output.file_name().is_none() => {
                errors.push(ConfigError::InvalidOutput {
                    path: output.clone(),
                });
                output.clone()
            }
            Some(output) => output.clone(),
            None => {
                errors.push(ConfigError::MissingOutput);
                PathBuf::new()
            }
        };

        let module_kind = match args.module_kind.as_deref() {
            None => ModuleKind::Plain,
            Some(value) => lookup(&MODULE_KINDS, value).unwrap_or_else(|| {
                errors.push(ConfigError::UnknownModuleKind {
                    value: value.to_string(),
                    valid: valid_names(&MODULE_KINDS),
                });
                ModuleKind::Plain
            }),
        };

        let target = match args.target.as_deref() {
            None => EcmaVersion::default(),
            Some(value) => lookup(&ECMA_VERSIONS, value).unwrap_or_else(|| {
                errors.push(ConfigError::UnsupportedTarget {
                    value: value.to_string(),
                });
                EcmaVersion::default()
            }),
        };

        let embed_sources = match args.source_map_embed_sources.as_deref() {
            None => SourceMapEmbedding::Inlining,
            Some(value) => lookup(&SOURCE_MAP_EMBEDDINGS, value).unwrap_or_else(|| {
                errors.push(ConfigError::UnknownSourceMapEmbedding {
                    value: value.to_string(),
                    valid: valid_names(&SOURCE_MAP_EMBEDDINGS),
                });
                SourceMapEmbedding::Inlining
            }),
        };

        if !errors.is_empty() {
            return Err(DriverError::Configuration(errors));
        }

        warn_about_source_maps(args);

        let main_call = match args.main.as_deref() {
            Some(NO_CALL) => MainCall::NoCall,
            _ => MainCall::Call,
        };

        let friend_paths = match &args.friend_modules {
            Some(list) if !args.friend_modules_disabled => parse_library_list(list)
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            _ => Vec::new(),
        };

        let libraries = args
            .libraries
            .as_deref()
            .map(|list| without_legacy_runtime(parse_library_list(list)))
            .unwrap_or_default();

        Ok(Self {
            sources: args.sources.iter().map(PathBuf::from).collect(),
            libraries,
            output,
            meta_info: args.meta_info,
            module_kind,
            target,
            main_call,
            source_map: SourceMapConfig {
                enabled: args.source_map,
                prefix: args.source_map_prefix.clone(),
                base_dirs: args
                    .source_map_base_dirs
                    .as_deref()
                    .map(|dirs| parse_library_list(dirs).into_iter().map(PathBuf::from).collect())
                    .unwrap_or_default(),
                embed_sources,
            },
            friend_paths,
            typed_arrays: args.typed_arrays,
            incremental: args.incremental,
            verbose: args.verbose,
            keep_extracted: args.keep_extracted,
        })
    }

    /// Module name: the output file name without its extension
    pub fn module_name(&self) -> String {
        module_name(&self.output)
    }
}

pub fn module_name(output: &Path) -> String {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn lookup<T: Copy>(table: &[(&str, T)], value: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, item)| *item)
}

fn valid_names<T>(table: &[(&str, T)]) -> String {
    table
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn warn_about_source_maps(args: &CompilerArguments) {
    if args.source_map {
        warn!("source-map argument is not supported yet");
        return;
    }
    if args.source_map_prefix.is_some() {
        warn!("source-map-prefix argument has no effect without source map");
    }
    if args.source_map_base_dirs.is_some() {
        warn!("source-map-base-dirs argument has no effect without source map");
    }
    if args.source_map_embed_sources.is_some() {
        warn!("source-map-embed-sources argument has no effect without source map");
    }
}
