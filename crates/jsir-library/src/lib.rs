//! Jsir Library Resolution
//!
//! Turns the raw `--libraries` entries of a compilation into a validated,
//! ordered [`DependencySet`]. Entries may be plain library directories or
//! zip/jar archives that contain one; archives are unpacked into scoped
//! temporary directories before validation.

pub mod archive;
pub mod error;
pub mod reference;
pub mod resolver;
pub mod validator;

pub use archive::{is_archive, unpack, UnpackedLibrary};
pub use error::{LibraryError, LibraryResult};
pub use reference::{DependencySet, LibraryReference};
pub use resolver::{parse_library_list, resolve_libraries, without_legacy_runtime, LIST_SEPARATOR};
pub use validator::validate;

/// Extension of the metadata descriptor that names a compiled library.
pub const METADATA_EXTENSION: &str = "meta";

/// Suffix of the directory that holds the library inside an archive.
///
/// Library artifacts written by the compiler use the same suffix, so zipping
/// one up produces an archive this crate can read back.
pub const LIBRARY_ROOT_SUFFIX: &str = ".jslib";
