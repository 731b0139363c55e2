//! End-to-end generation from a harness manifest.
//!
//! Module files are never opened; only the artifacts directory needs to exist.

use std::path::Path;
use std::time::Duration;

use harness_toolchain::HarnessError;
use harness_toolchain::config::{load_manifest, parse_manifest};
use harness_toolchain::core::{DefaultResolver, HostPlatform};
use harness_toolchain::engine::{
    ArtifactCleaner, FsRemover, RecordingSleeper, RetryPolicy, clean, generate,
};

fn write_manifest(dir: &Path, platform: &str) -> std::path::PathBuf {
    let manifest = format!(
        r#"
program_name = "Prog"
runtime_module = "R"
generator_module = "G"

[target]
type_name = "Benches.Strings"
method = "Concat"
module = "Target"

[job]
platform = "{platform}"

[[module]]
name = "Target"
location = "bin/Target.dll"
dependencies = ["A", "B"]

[[module]]
name = "A"
location = "bin/A.dll"
dependencies = ["C"]

[[module]]
name = "B"
location = "bin/B.dll"

[[module]]
name = "C"
location = "bin/C.dll"

[[module]]
name = "R"
location = "bin/R.dll"

[[module]]
name = "G"
location = "bin/G.dll"
"#
    );
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    let path = dir.join("harness.toml");
    std::fs::write(&path, manifest).unwrap();
    path
}

fn test_cleaner() -> ArtifactCleaner<FsRemover, RecordingSleeper> {
    ArtifactCleaner::with_parts(RetryPolicy::default(), FsRemover, RecordingSleeper::new())
}

#[test]
fn test_reference_set_for_example_graph() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = load_manifest(&write_manifest(dir.path(), "x64")).unwrap();
    let inputs = manifest.inputs(HostPlatform::Unix);

    let set = inputs
        .closure_resolver()
        .resolve(&inputs.target, &manifest.provider)
        .unwrap();
    let mut names: Vec<&str> = set.ids().map(|id| id.name()).collect();
    assert_eq!(names.len(), 6);
    names.sort();
    assert_eq!(names, vec!["A", "B", "C", "G", "R", "Target"]);
}

#[test]
fn test_generate_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = load_manifest(&write_manifest(dir.path(), "x64")).unwrap();
    let inputs = manifest.inputs(HostPlatform::Unix);
    let bin = dir.path().join("bin");

    // Leftovers from a previous run
    std::fs::write(bin.join("Prog.exe"), b"old").unwrap();
    std::fs::write(bin.join("Prog.sh"), b"old").unwrap();

    let outcome = generate(&inputs, &manifest.provider, &DefaultResolver, &test_cleaner()).unwrap();

    assert_eq!(outcome.paths.artifacts_dir, bin);
    assert!(!bin.join("Prog.exe").exists());
    assert!(bin.join("Prog.exe.config").exists());

    let script = std::fs::read_to_string(bin.join("Prog.sh")).unwrap();
    assert_eq!(script, outcome.script.content);
    assert!(script.starts_with("#!/bin/bash\nmono csc /noconfig /target:exe /optimize /unsafe "));
    assert_eq!(script.matches("/platform:x64").count(), 1);
    assert!(script.ends_with(" Prog.cs"));
    assert_eq!(outcome.script.sha256, harness_toolchain::sha256_hex(script.as_bytes()));
}

#[test]
fn test_generate_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = load_manifest(&write_manifest(dir.path(), "arm64")).unwrap();
    let inputs = manifest.inputs(HostPlatform::Windows);

    let first = generate(&inputs, &manifest.provider, &DefaultResolver, &test_cleaner()).unwrap();
    let first_bytes = std::fs::read(&first.script.path).unwrap();
    let second = generate(&inputs, &manifest.provider, &DefaultResolver, &test_cleaner()).unwrap();
    let second_bytes = std::fs::read(&second.script.path).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert!(first.script.path.ends_with("Prog.bat"));
    assert!(first.script.content.starts_with("csc /noconfig"));
    assert!(first.script.content.contains("/platform:arm64"));
}

#[test]
fn test_missing_reference_aborts_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(dir.path(), "x64");
    let text = std::fs::read_to_string(&path)
        .unwrap()
        .replace(r#"dependencies = ["C"]"#, r#"dependencies = ["C", "Missing"]"#);
    let manifest = parse_manifest(&text, dir.path()).unwrap();
    let inputs = manifest.inputs(HostPlatform::Unix);

    let err = generate(&inputs, &manifest.provider, &DefaultResolver, &test_cleaner()).unwrap_err();
    match err {
        HarnessError::ReferenceResolution { reference, .. } => assert_eq!(reference, "Missing"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("bin").join("Prog.sh").exists());
}

#[test]
fn test_clean_without_artifacts_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = load_manifest(&write_manifest(dir.path(), "x64")).unwrap();
    let inputs = manifest.inputs(HostPlatform::Unix);

    let cleaner = ArtifactCleaner::with_parts(
        RetryPolicy::new(5, Duration::from_secs(1)),
        FsRemover,
        RecordingSleeper::new(),
    );
    let paths = clean(&inputs, &cleaner).unwrap();
    assert_eq!(paths.artifacts_dir, dir.path().join("bin"));
    assert_eq!(cleaner.sleeper().calls(), 0);
}

#[test]
fn test_missing_artifacts_directory_is_resolution_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(dir.path(), "x64");
    std::fs::remove_dir(dir.path().join("bin")).unwrap();
    let manifest = load_manifest(&path).unwrap();
    let inputs = manifest.inputs(HostPlatform::Unix);

    let err = generate(&inputs, &manifest.provider, &DefaultResolver, &test_cleaner()).unwrap_err();
    assert!(matches!(err, HarnessError::Resolution { .. }));
}
