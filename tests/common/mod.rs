#![allow(dead_code)]

//! Shared testing harness for `mailforge` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated source tree for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

impl TestContext {
    /// Create a new isolated working directory.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Default output root for builds run in this context.
    pub(crate) fn output(&self) -> PathBuf {
        self.work_dir.join("output")
    }

    /// A `mailforge` command rooted in the test working directory.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("mailforge").expect("Failed to find mailforge binary");
        cmd.current_dir(&self.work_dir);
        cmd.env_remove("MAILFORGE_ENV");
        cmd
    }

    pub(crate) fn write_text_template(&self, name: &str, content: &str) {
        self.write_source(&format!("src/templates/text/{name}"), content.as_bytes());
    }

    pub(crate) fn write_html_template(&self, name: &str, content: &str) {
        self.write_source(&format!("src/templates/html/{name}"), content.as_bytes());
    }

    pub(crate) fn write_locale(&self, code: &str, content: &str) {
        self.write_source(&format!("src/locales/{code}.yaml"), content.as_bytes());
    }

    pub(crate) fn write_asset(&self, relative: &str, bytes: &[u8]) {
        self.write_source(&format!("src/assets/{relative}"), bytes);
    }

    /// Write `mailforge.toml` in the working directory.
    pub(crate) fn write_config(&self, content: &str) {
        fs::write(self.work_dir.join("mailforge.toml"), content)
            .expect("Failed to write mailforge.toml");
    }

    fn write_source(&self, relative: &str, bytes: &[u8]) {
        let path = self.work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source directory");
        }
        fs::write(&path, bytes).expect("Failed to write source file");
    }

    /// Snapshot a directory tree as relative-path → content pairs.
    pub(crate) fn snapshot(&self, dir: &Path) -> std::collections::BTreeMap<String, Vec<u8>> {
        let mut snapshot = std::collections::BTreeMap::new();
        if !dir.exists() {
            return snapshot;
        }
        let mut stack = vec![dir.to_path_buf()];
        while let Some(current) = stack.pop() {
            for entry in fs::read_dir(&current).expect("Failed to read directory") {
                let entry = entry.expect("Failed to read directory entry");
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let relative = path
                        .strip_prefix(dir)
                        .expect("Entry should live under the snapshot root")
                        .to_string_lossy()
                        .into_owned();
                    snapshot.insert(relative, fs::read(&path).expect("Failed to read file"));
                }
            }
        }
        snapshot
    }
}
