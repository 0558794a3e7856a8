//! Source discovery

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, DriverError, DriverResult};

/// Extension of source files picked up from source directories
pub const SOURCE_EXTENSION: &str = "src";

/// Resolve source arguments into concrete files.
///
/// Files are taken as given, whatever their extension; directories are
/// searched recursively for `.src` files in name order. Results are
/// canonical paths, each listed once, in discovery order.
pub fn discover_sources(roots: &[PathBuf]) -> DriverResult<Vec<PathBuf>> {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();
    let mut missing = Vec::new();

    for root in roots {
        if root.is_file() {
            add_source(root, &mut sources, &mut seen)?;
        } else if root.is_dir() {
            let mut found = Vec::new();
            collect_dir(root, &mut found).map_err(|e| {
                DriverError::io(format!("failed to read source directory {}", root.display()), e)
            })?;
            for file in found {
                add_source(&file, &mut sources, &mut seen)?;
            }
        } else {
            missing.push(ConfigError::SourceNotFound { path: root.clone() });
        }
    }

    if !missing.is_empty() {
        return Err(DriverError::Configuration(missing));
    }

    debug!(count = sources.len(), "sources discovered");
    Ok(sources)
}

fn add_source(
    path: &Path,
    sources: &mut Vec<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) -> DriverResult<()> {
    let canonical = path.canonicalize().map_err(|e| {
        DriverError::io(format!("failed to resolve source {}", path.display()), e)
    })?;
    if seen.insert(canonical.clone()) {
        sources.push(canonical);
    }
    Ok(())
}

fn collect_dir(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            collect_dir(&entry, found)?;
        } else if entry.extension() == Some(OsStr::new(SOURCE_EXTENSION)) {
            found.push(entry);
        }
    }
    Ok(())
}
