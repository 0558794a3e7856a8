//! Unpacking of archived libraries
//!
//! A library can be shipped as a zip (or jar) file holding a `*.jslib`
//! directory. The archive is extracted into a fresh temporary directory and
//! the first directory entry carrying the library-root suffix becomes the
//! library root.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{LibraryError, LibraryResult};
use crate::LIBRARY_ROOT_SUFFIX;

const ARCHIVE_EXTENSIONS: [&str; 2] = ["zip", "jar"];

/// A library extracted from an archive
#[derive(Debug)]
pub struct UnpackedLibrary {
    root: PathBuf,
    temp_dir: TempDir,
}

impl UnpackedLibrary {
    /// The `*.jslib` directory inside the extraction directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory everything was extracted into
    pub fn extraction_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn into_parts(self) -> (PathBuf, TempDir) {
        (self.root, self.temp_dir)
    }
}

/// Check whether a path names a regular zip-compatible archive file
pub fn is_archive(path: &Path) -> bool {
    let has_archive_extension = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        });
    has_archive_extension && path.is_file()
}

/// Extract an archived library.
///
/// `library` is the entry as written by the user and is only used for
/// error reporting.
pub fn unpack(library: &str, path: &Path) -> LibraryResult<UnpackedLibrary> {
    let file = File::open(path).map_err(|e| LibraryError::io(library, "open archive", e))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| LibraryError::io(library, "read archive", e.into()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_dir = tempfile::Builder::new()
        .prefix(&format!("{name}-"))
        .suffix(".jslibzip")
        .tempdir()
        .map_err(|e| LibraryError::io(library, "create extraction directory", e))?;

    let mut root: Option<PathBuf> = None;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| LibraryError::io(library, "read archive entry", e.into()))?;
        let entry_name = entry.name().to_string();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| LibraryError::UnsafeEntry {
                library: library.to_string(),
                entry: entry_name.clone(),
            })?;
        let target = temp_dir.path().join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| LibraryError::io(library, "create directory", e))?;
            if root.is_none() && is_library_root(&entry_name) {
                debug!(library, root = %target.display(), "library extracted");
                root = Some(target);
            }
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| LibraryError::io(library, "create directory", e))?;
            }
            let mut output = File::create(&target)
                .map_err(|e| LibraryError::io(library, "extract entry", e))?;
            io::copy(&mut entry, &mut output)
                .map_err(|e| LibraryError::io(library, "extract entry", e))?;
        }
    }

    match root {
        Some(root) => Ok(UnpackedLibrary { root, temp_dir }),
        None => Err(LibraryError::MissingLibraryRoot {
            library: library.to_string(),
            marker: LIBRARY_ROOT_SUFFIX,
        }),
    }
}

fn is_library_root(entry_name: &str) -> bool {
    entry_name.trim_end_matches('/').ends_with(LIBRARY_ROOT_SUFFIX)
}
