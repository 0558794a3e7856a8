//! Resolution of the `--libraries` list into a dependency set

use std::path::Path;

use tracing::{debug, info};

use crate::archive::{is_archive, unpack};
use crate::error::LibraryResult;
use crate::reference::DependencySet;
use crate::validator::validate;

/// Separator between entries of a library list (`:` on Unix, `;` on Windows)
#[cfg(windows)]
pub const LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const LIST_SEPARATOR: char = ':';

/// Runtime jars from the pre-IR toolchain that must never reach the backend
const LEGACY_RUNTIME_MARKERS: [&str; 2] = ["-stdlib-js-1.3", "-stdlib-common-1.3"];

/// Split a separator-delimited library list, dropping empty segments
pub fn parse_library_list(list: &str) -> Vec<String> {
    list.split(LIST_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop legacy runtime jars from a library list
pub fn without_legacy_runtime(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| {
            let legacy = is_legacy_runtime(entry);
            if legacy {
                debug!(library = %entry, "skipping legacy runtime jar");
            }
            !legacy
        })
        .collect()
}

fn is_legacy_runtime(entry: &str) -> bool {
    let name = Path::new(entry)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.ends_with(".jar") && LEGACY_RUNTIME_MARKERS.iter().any(|m| name.contains(m))
}

/// Validate every entry in order and collect the results.
///
/// Archives are unpacked first. The first failing entry aborts the whole
/// resolution; later entries are never touched.
pub fn resolve_libraries<S: AsRef<str>>(entries: &[S]) -> LibraryResult<DependencySet> {
    let mut set = DependencySet::new();

    for entry in entries {
        let library = entry.as_ref();
        let path = Path::new(library);

        let reference = if is_archive(path) {
            let (root, temp_dir) = unpack(library, path)?.into_parts();
            set.hold(temp_dir);
            validate(library, &root)?
        } else {
            validate(library, path)?
        };

        set.push(reference);
    }

    info!(count = set.len(), "libraries resolved");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibraryError;
    use std::fs;

    fn library_dir(root: &Path, name: &str) -> String {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.meta")), "{}").unwrap();
        fs::write(dir.join(format!("{name}.js")), "").unwrap();
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_parse_library_list_drops_empty_segments() {
        let list = format!("a{sep}{sep}b{sep}", sep = LIST_SEPARATOR);
        assert_eq!(parse_library_list(&list), vec!["a", "b"]);
        assert!(parse_library_list("").is_empty());
    }

    #[test]
    fn test_legacy_runtime_filter() {
        let entries = vec![
            "libs/x-stdlib-js-1.3.72.jar".to_string(),
            "libs/x-stdlib-common-1.3.0.jar".to_string(),
            "libs/x-stdlib-js-1.4.0.jar".to_string(),
            "libs/alpha".to_string(),
        ];
        assert_eq!(
            without_legacy_runtime(entries),
            vec!["libs/x-stdlib-js-1.4.0.jar", "libs/alpha"]
        );
    }

    #[test]
    fn test_empty_input_is_valid() {
        let set = resolve_libraries::<String>(&[]).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let beta = library_dir(dir.path(), "beta");
        let alpha = library_dir(dir.path(), "alpha");

        let set = resolve_libraries(&[beta.clone(), alpha, beta]).unwrap();
        assert_eq!(set.identifiers(), vec!["beta", "alpha", "beta"]);
    }

    #[test]
    fn test_first_malformed_entry_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let alpha = library_dir(dir.path(), "alpha");
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        let empty = empty.to_string_lossy().into_owned();
        let missing = dir.path().join("missing").to_string_lossy().into_owned();

        let err = resolve_libraries(&[alpha, empty.clone(), missing]).unwrap_err();
        assert!(matches!(err, LibraryError::Empty { .. }));
        assert_eq!(err.library(), empty);
    }

    #[test]
    fn test_archive_matches_directory() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("alpha.jslib");
        fs::create_dir(&plain).unwrap();
        fs::write(plain.join("alpha.meta"), "{}").unwrap();
        fs::write(plain.join("alpha.js"), "var alpha = {};").unwrap();

        let archive = dir.path().join("alpha.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
        writer
            .add_directory("alpha.jslib/", SimpleFileOptions::default())
            .unwrap();
        for name in ["alpha.meta", "alpha.js"] {
            writer
                .start_file(format!("alpha.jslib/{name}"), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(&fs::read(plain.join(name)).unwrap()).unwrap();
        }
        writer.finish().unwrap();

        let plain = plain.to_string_lossy().into_owned();
        let archive = archive.to_string_lossy().into_owned();
        let from_dir = resolve_libraries(&[plain]).unwrap();
        let from_zip = resolve_libraries(&[archive]).unwrap();

        assert_eq!(from_dir.identifiers(), from_zip.identifiers());
        assert_eq!(from_zip.extracted_dirs().len(), 1);
        for name in ["alpha.meta", "alpha.js"] {
            assert_eq!(
                fs::read(from_dir.libraries()[0].directory().join(name)).unwrap(),
                fs::read(from_zip.libraries()[0].directory().join(name)).unwrap()
            );
        }
    }
}
