#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A feature branch sharing `b2` with main, plus repository info.
pub const SAMPLE_SNAPSHOT: &str = r#"{
  "repository_info": {"name": "demo", "language": "Rust", "stars": 4, "forks": 1},
  "branches": [
    {
      "name": "feature",
      "head": "b2",
      "commits": [
        {"hash": "f1", "parent": "", "message": "start feature", "author": "bo", "date": "2024-03-02"},
        {"hash": "b2", "parent": "f1", "message": "shared work", "author": "ana", "date": "2024-03-03"}
      ]
    },
    {
      "name": "main",
      "head": "b2",
      "commits": [
        {"hash": "a1", "parent": null, "message": "initial", "author": "ana", "date": "2024-03-01"},
        {"hash": "b2", "parent": "a1", "message": "shared work", "author": "ana", "date": "2024-03-03"}
      ]
    }
  ]
}"#;

/// Write `contents` to `name` inside a fresh temp dir.
pub fn write_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write file");
    (dir, path)
}

/// Run gitscope with the given args in the given directory.
pub fn gitscope_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitscope"))
        .args(args)
        .current_dir(dir)
        .env_remove("GITSCOPE_CONFIG")
        .env_remove("GITSCOPE_LOG")
        .env_remove("GITSCOPE_LOG_FILE")
        .env_remove("GITSCOPE_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute gitscope")
}

/// Run gitscope and assert it succeeds. Returns stdout as string.
pub fn gitscope_ok(dir: &Path, args: &[&str]) -> String {
    let out = gitscope_in(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "gitscope {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}
