//! Validation of a library directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LibraryError, LibraryResult};
use crate::reference::LibraryReference;
use crate::METADATA_EXTENSION;

/// Validate a directory that should hold exactly one compiled library.
///
/// The directory must be non-empty and contain a `.meta` descriptor; the
/// descriptor's name minus `.meta` becomes the library identifier. When several
/// descriptors are present the first one in name order wins.
pub fn validate(library: &str, directory: &Path) -> LibraryResult<LibraryReference> {
    if !directory.is_dir() {
        return Err(LibraryError::NotADirectory {
            library: library.to_string(),
        });
    }

    let children = list_children(directory)
        .map_err(|e| LibraryError::io(library, "list directory", e))?;
    if children.is_empty() {
        return Err(LibraryError::Empty {
            library: library.to_string(),
        });
    }

    let identifier = children
        .iter()
        .find_map(|child| metadata_identifier(child))
        .ok_or_else(|| LibraryError::MissingMetadata {
            library: library.to_string(),
            extension: METADATA_EXTENSION,
        })?;
    let directory = std::path::absolute(directory)
        .map_err(|e| LibraryError::io(library, "resolve directory", e))?;

    debug!(library, identifier = %identifier, directory = %directory.display(), "library validated");
    Ok(LibraryReference::new(identifier, directory))
}

/// Identifier named by a metadata file: its name minus `.meta`.
///
/// Matches on the raw name, so a bare `.meta` dotfile counts and yields an
/// empty identifier.
fn metadata_identifier(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let identifier = name
        .strip_suffix(METADATA_EXTENSION)?
        .strip_suffix('.')?
        .to_string();
    path.is_file().then_some(identifier)
}

/// Immediate children in a stable order
fn list_children(directory: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children = fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    children.sort();
    Ok(children)
}
