//! Resolved library references and the dependency set handed to the backend

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A validated library: its identifier and the directory holding it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryReference {
    identifier: String,
    directory: PathBuf,
}

impl LibraryReference {
    pub fn new(identifier: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            directory: directory.into(),
        }
    }

    /// Name of the metadata descriptor without its extension
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Absolute path of the library directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Ordered, fully validated libraries for one compilation.
///
/// Order is input order. Duplicates are kept; conflict resolution belongs
/// to the backend. Directories extracted from archives are owned here and
/// removed when the set is dropped, unless [`DependencySet::persist_extracted`]
/// is called first.
#[derive(Debug, Default)]
pub struct DependencySet {
    libraries: Vec<LibraryReference>,
    extracted: Vec<TempDir>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, library: LibraryReference) {
        self.libraries.push(library);
    }

    pub(crate) fn hold(&mut self, temp_dir: TempDir) {
        self.extracted.push(temp_dir);
    }

    pub fn libraries(&self) -> &[LibraryReference] {
        &self.libraries
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LibraryReference> {
        self.libraries.iter()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.libraries.iter().map(LibraryReference::identifier).collect()
    }

    /// Extraction directories currently owned by this set
    pub fn extracted_dirs(&self) -> Vec<&Path> {
        self.extracted.iter().map(TempDir::path).collect()
    }

    /// Stop deleting extracted archives on drop and return their locations.
    pub fn persist_extracted(&mut self) -> Vec<PathBuf> {
        self.extracted.drain(..).map(TempDir::keep).collect()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a LibraryReference;
    type IntoIter = std::slice::Iter<'a, LibraryReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
