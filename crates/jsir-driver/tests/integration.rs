//! Integration tests for the jsirc binary.
//!
//! Each test lays out sources and libraries in a temp directory, runs the
//! compiler and checks the exit code and files it leaves behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use jsir_library::LIST_SEPARATOR;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn jsirc() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_jsirc"));
    command.env_remove("JSIR_LIBRARIES");
    command.env_remove("JSIR_INCREMENTAL");
    command.env_remove("JSIR_LOG");
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to run jsirc")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "Compilation failed!\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn write_source(dir: &Path) -> PathBuf {
    let path = dir.join("main.src");
    fs::write(&path, "function main() { console.log('hi'); }\n").unwrap();
    path
}

fn write_library(dir: &Path, name: &str) -> PathBuf {
    let lib = dir.join("libs").join(name);
    fs::create_dir_all(&lib).unwrap();
    fs::write(lib.join(format!("{name}.meta")), "{}").unwrap();
    fs::write(lib.join(format!("{name}.js")), "").unwrap();
    lib
}

fn write_archive(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(format!("{name}.zip"));
    let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
    let options = SimpleFileOptions::default();
    zip.add_directory(format!("{name}.jslib/"), options).unwrap();
    zip.start_file(format!("{name}.jslib/{name}.meta"), options)
        .unwrap();
    zip.write_all(b"{}").unwrap();
    zip.start_file(format!("{name}.jslib/{name}.js"), options)
        .unwrap();
    zip.write_all(b"").unwrap();
    zip.finish().unwrap();
    path
}

fn join(entries: &[&Path]) -> String {
    entries
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

#[test]
fn test_compile_against_library() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let alpha = write_library(dir.path(), "alpha");
    fs::create_dir(dir.path().join("out")).unwrap();
    let output_path = dir.path().join("out/app.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--libraries")
        .arg(&alpha)
        .arg("-o")
        .arg(&output_path));

    assert_success(&output);
    let module = fs::read_to_string(&output_path).unwrap();
    assert!(module.starts_with("// app (plain module"));
    assert!(module.contains("alpha"));
    assert!(!dir.path().join("out/app.js.jslib").exists());
}

#[test]
fn test_empty_library_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let alpha = write_library(dir.path(), "alpha");
    let empty = dir.path().join("libs/empty");
    fs::create_dir_all(&empty).unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let output_path = dir.path().join("out/app.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--libraries")
        .arg(join(&[&alpha, &empty]))
        .arg("-o")
        .arg(&output_path));

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty"), "stderr: {}", stderr);
}

#[test]
fn test_libraries_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let beta = write_library(dir.path(), "beta");
    let output_path = dir.path().join("app.js");

    let output = run(jsirc()
        .env("JSIR_LIBRARIES", &beta)
        .arg(&source)
        .arg("-o")
        .arg(&output_path));

    assert_success(&output);
    assert!(fs::read_to_string(&output_path).unwrap().contains("beta"));
}

#[test]
fn test_archive_library() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let archive = write_archive(dir.path(), "gamma");
    let output_path = dir.path().join("app.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--libraries")
        .arg(&archive)
        .arg("--module-kind")
        .arg("commonjs")
        .arg("-o")
        .arg(&output_path));

    assert_success(&output);
    let module = fs::read_to_string(&output_path).unwrap();
    assert!(module.contains("require('gamma')"), "module: {}", module);
}

#[test]
fn test_library_artifact_can_be_reused() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let lib_output = dir.path().join("util.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--meta-info")
        .arg("-o")
        .arg(&lib_output));
    assert_success(&output);

    let artifact = dir.path().join("util.js.jslib");
    assert!(artifact.join("util.meta").is_file());
    assert!(artifact.join("util.js").is_file());

    let app_output = dir.path().join("app.js");
    let output = run(jsirc()
        .arg(&source)
        .arg("--libraries")
        .arg(&artifact)
        .arg("-o")
        .arg(&app_output));
    assert_success(&output);
    assert!(fs::read_to_string(&app_output).unwrap().contains("util"));
}

#[test]
fn test_unknown_module_kind() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let output_path = dir.path().join("app.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--module-kind")
        .arg("esm")
        .arg("-o")
        .arg(&output_path));

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("esm"));
}

#[test]
fn test_version_only() {
    let output = run(jsirc().arg("--version"));
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("jsirc "), "stdout: {}", stdout);
}

#[test]
fn test_no_sources_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(jsirc().arg("-o").arg(dir.path().join("app.js")));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_no_call_main() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let output_path = dir.path().join("app.js");

    let output = run(jsirc()
        .arg(&source)
        .arg("--main")
        .arg("noCall")
        .arg("-o")
        .arg(&output_path));

    assert_success(&output);
    assert!(!fs::read_to_string(&output_path).unwrap().contains("main();"));
}
