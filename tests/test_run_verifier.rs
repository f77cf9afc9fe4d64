// Spawns a fake verifier script, so unix only.
#![cfg(unix)]

mod common;

use common::fixtures::*;
use e_annotate::{
    run_verifier, Annotation, AnnotateConfig, AnnotationSink, CollectingSink, Severity, TargetMode,
};
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// A sink whose output has gone away, like a closed stdout.
struct BrokenSink;

impl AnnotationSink for BrokenSink {
    fn report(&mut self, _annotation: &Annotation) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn fail(&mut self, _message: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

fn fake_verifier(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

// printf rather than echo: dash's echo expands the `\n` inside rendered text.
// One test so the scripts are never written while another thread forks.
#[test]
fn test_run_fake_verifiers() {
    let scratch = Scratch::new().unwrap();

    // crate mode: json on stdout, failing exit
    let crate_dir = scratch.path().join("demo");
    fs::create_dir_all(&crate_dir).unwrap();
    let cargo = fake_verifier(
        scratch.path(),
        "fake-cargo",
        &format!(
            "echo '   Compiling demo'\nprintf '%s\\n' '{}' '{}' '{}'\nexit 101",
            wrapped(DIRECT_ERROR),
            wrapped(DIRECT_SUMMARY),
            BUILD_FINISHED
        ),
    );
    let mut config = AnnotateConfig::new(&crate_dir, TargetMode::Project);
    config.cargo = cargo.to_string_lossy().to_string();
    let mut sink = CollectingSink::default();
    let report = run_verifier(&config, &mut sink).unwrap();
    assert_eq!(report.annotations, 1);
    assert!(!report.success);
    assert_eq!(sink.annotations[0].severity, Severity::Error);
    let file = sink.annotations[0].file().unwrap();
    assert!(file.ends_with("demo/src/lib.rs"), "{}", file);
    assert_eq!(sink.failures.len(), 1);
    assert!(sink.failures[0].ends_with("exited with a non-zero exit code"));

    // single-file mode: json on stderr, clean exit
    let rustc = fake_verifier(
        scratch.path(),
        "fake-rustc",
        &format!(
            "echo 'human text on stdout'\nprintf '%s\\n' '{}' '{}' >&2",
            DIRECT_NESTED_WARNING, DIRECT_NO_SPAN
        ),
    );
    let mut config = AnnotateConfig::new("src/lib.rs", TargetMode::SingleFile);
    config.rustc = rustc.to_string_lossy().to_string();
    let mut sink = CollectingSink::default();
    let report = run_verifier(&config, &mut sink).unwrap();
    assert!(report.success);
    assert_eq!(report.annotations, 2);
    assert_eq!(sink.annotations[0].file(), Some("src/child.rs"));
    assert!(sink.annotations[1].location.is_none());
    assert!(sink.failures.is_empty());

    // sink error mid-stream: the verifier is killed instead of left running
    let marker = scratch.path().join("still-running");
    let slow = fake_verifier(
        scratch.path(),
        "fake-slow-rustc",
        &format!(
            "printf '%s\\n' '{}' >&2\nsleep 2\ntouch '{}'",
            DIRECT_ERROR,
            marker.display()
        ),
    );
    let mut config = AnnotateConfig::new("src/lib.rs", TargetMode::SingleFile);
    config.rustc = slow.to_string_lossy().to_string();
    let err = run_verifier(&config, &mut BrokenSink).unwrap_err();
    assert!(format!("{:#}", err).contains("sink closed"), "{:#}", err);
    thread::sleep(Duration::from_secs(4));
    assert!(!marker.exists(), "verifier kept running after the sink failed");
}
