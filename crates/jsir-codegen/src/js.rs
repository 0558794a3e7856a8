//! Bundled JavaScript backend
//!
//! Source text is taken as already-lowered target code: each file is
//! emitted in order inside a factory function, and the factory is wired to
//! its dependencies according to the module kind.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use jsir_library::{LibraryReference, METADATA_EXTENSION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{BackendConfig, MainCall, ModuleKind};
use crate::error::{BackendError, BackendResult};
use crate::Backend;

/// Descriptor written next to a serialized library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    pub module_name: String,
    pub module_kind: ModuleKind,
    pub dependencies: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsBackend;

impl JsBackend {
    pub fn new() -> Self {
        Self
    }
}

struct SourceText {
    name: String,
    text: String,
}

impl Backend for JsBackend {
    fn compile(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        _all: &[LibraryReference],
    ) -> BackendResult<String> {
        let sources = read_sources(sources)?;
        let dependencies = dependency_names(immediate);

        let module = render_module(config, &sources, &dependencies);
        info!(
            module = %config.module_name,
            kind = %config.module_kind,
            bytes = module.len(),
            "module generated"
        );
        Ok(module)
    }

    fn generate_library(
        &self,
        sources: &[PathBuf],
        config: &BackendConfig,
        immediate: &[LibraryReference],
        all: &[LibraryReference],
        output: &Path,
    ) -> BackendResult<()> {
        let code = self.compile(sources, config, immediate, all)?;
        let write_err = |source| BackendError::LibraryWrite {
            path: output.to_path_buf(),
            source,
        };

        // A stale descriptor with another name would shadow the new one.
        if output.is_dir() {
            fs::remove_dir_all(output).map_err(write_err)?;
        } else if output.exists() {
            fs::remove_file(output).map_err(write_err)?;
        }
        fs::create_dir_all(output).map_err(write_err)?;

        let base_name = if config.module_name.is_empty() {
            "main"
        } else {
            config.module_name.as_str()
        };
        let metadata = LibraryMetadata {
            module_name: base_name.to_string(),
            module_kind: config.module_kind,
            dependencies: dependency_names(immediate),
            sources: sources.iter().map(|p| file_label(p)).collect(),
        };
        let descriptor = serde_json::to_string_pretty(&metadata)?;

        fs::write(output.join(format!("{base_name}.js")), code).map_err(write_err)?;
        fs::write(
            output.join(format!("{base_name}.{METADATA_EXTENSION}")),
            descriptor,
        )
        .map_err(write_err)?;

        info!(library = %output.display(), "library artifact generated");
        Ok(())
    }
}

fn read_sources(paths: &[PathBuf]) -> BackendResult<Vec<SourceText>> {
    paths
        .iter()
        .map(|path| {
            debug!(source = %path.display(), "reading source");
            let text = fs::read_to_string(path).map_err(|source| BackendError::SourceRead {
                path: path.clone(),
                source,
            })?;
            Ok(SourceText {
                name: file_label(path),
                text,
            })
        })
        .collect()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Dependency identifiers, first occurrence wins
fn dependency_names(libraries: &[LibraryReference]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for library in libraries {
        if !names.iter().any(|n| n == library.identifier()) {
            names.push(library.identifier().to_string());
        }
    }
    names
}

/// Turn an arbitrary module name into a valid JavaScript identifier.
///
/// Characters that aren't alphanumeric, `_` or `$` are replaced with `_`;
/// a leading digit gets a `_` prefix.
pub fn js_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn js_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn render_module(config: &BackendConfig, sources: &[SourceText], dependencies: &[String]) -> String {
    let name = js_identifier(&config.module_name);
    let key = js_string(&config.module_name);
    let params: Vec<String> = std::iter::once("_".to_string())
        .chain(dependencies.iter().map(|d| js_identifier(d)))
        .collect();
    let factory = render_factory(config, sources, &params.join(", "));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "// {} ({} module, {} source file(s))",
        config.module_name,
        config.module_kind,
        sources.len()
    );

    match config.module_kind {
        ModuleKind::Plain => {
            let mut args = vec![format!("typeof {name} === 'undefined' ? {{}} : {name}")];
            args.extend(dependencies.iter().map(|d| js_identifier(d)));
            let _ = writeln!(out, "var {name} = ({factory}({}));", args.join(", "));
        }
        ModuleKind::CommonJs => {
            let mut args = vec!["module.exports".to_string()];
            args.extend(dependencies.iter().map(|d| format!("require({})", js_string(d))));
            let _ = writeln!(out, "({factory}({}));", args.join(", "));
        }
        ModuleKind::Amd => {
            let _ = writeln!(out, "define({}, {factory});", amd_deps(dependencies));
        }
        ModuleKind::Umd => {
            let mut requires = vec!["module.exports".to_string()];
            requires.extend(dependencies.iter().map(|d| format!("require({})", js_string(d))));
            let mut globals = vec![format!(
                "typeof root[{key}] === 'undefined' ? {{}} : root[{key}]"
            )];
            globals.extend(dependencies.iter().map(|d| format!("root[{}]", js_string(d))));

            out.push_str("(function (root, factory) {\n");
            out.push_str("  if (typeof define === 'function' && define.amd)\n");
            let _ = writeln!(out, "    define({}, factory);", amd_deps(dependencies));
            out.push_str("  else if (typeof exports === 'object')\n");
            let _ = writeln!(out, "    factory({});", requires.join(", "));
            out.push_str("  else\n");
            let _ = writeln!(out, "    root[{key}] = factory({});", globals.join(", "));
            let _ = writeln!(out, "}}(this, {factory}));");
        }
    }
    out
}

fn amd_deps(dependencies: &[String]) -> String {
    let entries: Vec<String> = std::iter::once("'exports'".to_string())
        .chain(dependencies.iter().map(|d| js_string(d)))
        .collect();
    format!("[{}]", entries.join(", "))
}

fn render_factory(config: &BackendConfig, sources: &[SourceText], params: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "function ({params}) {{");
    body.push_str("  'use strict';\n");
    for source in sources {
        let _ = writeln!(body, "  // {}", source.name);
        for line in source.text.lines() {
            if !line.is_empty() {
                body.push_str("  ");
                body.push_str(line);
            }
            body.push('\n');
        }
    }
    if config.main_call == MainCall::Call {
        body.push_str("  if (typeof main === 'function') {\n    main();\n  }\n");
    }
    body.push_str("  return _;\n}");
    body
}
