//! Property tests for library resolution and artifact naming.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;

use jsir_driver::library_artifact_path;
use jsir_library::{parse_library_list, resolve_libraries, LIST_SEPARATOR};
use tempfile::TempDir;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,11}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The library artifact is the output path with `.jslib` appended.
    #[test]
    fn property_artifact_path_appends_suffix(
        dirs in proptest::collection::vec(segment(), 0..=3),
        file in segment(),
    ) {
        let mut output = PathBuf::from("out");
        for dir in &dirs {
            output.push(dir);
        }
        output.push(&file);

        let artifact = library_artifact_path(&output);
        prop_assert_eq!(
            artifact.to_string_lossy().into_owned(),
            format!("{}.jslib", output.to_string_lossy())
        );
        prop_assert_eq!(artifact.parent(), output.parent());
    }

    /// PROPERTY: Parsing a joined list returns its non-empty entries in order.
    #[test]
    fn property_library_list_keeps_order(
        entries in proptest::collection::vec(proptest::option::of(segment()), 0..=6),
    ) {
        let list = entries
            .iter()
            .map(|e| e.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string());
        let expected: Vec<String> = entries.into_iter().flatten().collect();

        prop_assert_eq!(parse_library_list(&list), expected);
    }

    /// PROPERTY: Resolution preserves input order and duplicates.
    #[test]
    fn property_resolution_preserves_order(
        picks in proptest::collection::vec(0usize..4, 0..=8),
    ) {
        let root = TempDir::new().unwrap();
        let names = ["alpha", "beta", "gamma", "delta"];
        let mut dirs = Vec::new();
        for name in names {
            let dir = root.path().join(name);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join(format!("{name}.meta")), "{}").unwrap();
            dirs.push(dir.to_string_lossy().into_owned());
        }

        let requested: Vec<String> = picks.iter().map(|&i| dirs[i].clone()).collect();
        let dependencies = resolve_libraries(&requested).unwrap();

        let expected: Vec<&str> = picks.iter().map(|&i| names[i]).collect();
        prop_assert_eq!(dependencies.identifiers(), expected);
    }
}
