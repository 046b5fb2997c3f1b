// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A library checkout and a working directory, both temporary.
pub struct TestEnvironment {
    pub library: TempDir,
    pub work: TempDir,
}

impl TestEnvironment {
    pub fn library_root(&self) -> &Path {
        self.library.path()
    }

    pub fn working_dir(&self) -> &Path {
        self.work.path()
    }

    pub fn report_path(&self) -> PathBuf {
        self.work.path().join("compiling_result.html")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work.path().join("compiler_messages")
    }

    /// Adds a test source below `<library>/tests`.
    pub fn add_test_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.library.path().join("tests").join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create test directory");
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Writes `CompileMatrix.toml` into the working directory.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.work.path().join("CompileMatrix.toml");
        fs::write(&path, content).expect("Failed to write CompileMatrix.toml");
        path
    }

    /// Names of leftover output slot directories in the working directory.
    pub fn leftover_slots(&self) -> Vec<String> {
        fs::read_dir(self.work.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".compile-matrix-"))
            .collect()
    }
}

pub fn setup_test_environment() -> TestEnvironment {
    TestEnvironment {
        library: tempdir().expect("Failed to create library directory"),
        work: tempdir().expect("Failed to create working directory"),
    }
}

/// A "compiler" that copies the source to the output and succeeds silently.
pub const CLEAN_COMPILER: &str = r#"
[[compilers]]
name = "clean-cc"
program = "sh"
args = ["-c", "cat '{input}' > '{output}'"]
"#;

/// A "compiler" that succeeds but prints a warning.
pub const WARNING_COMPILER: &str = r#"
[[compilers]]
name = "noisy-cc"
program = "sh"
args = ["-c", "echo 'test.cpp:1: Warning: unused variable' >&2; cat '{input}' > '{output}'"]
"#;

/// A "compiler" that reports an error and exits with status 1.
pub const FAILING_COMPILER: &str = r#"
[[compilers]]
name = "broken-cc"
program = "sh"
args = ["-c", "echo 'error: expected ; before } token' >&2; exit 1", "{input}"]
"#;

/// A "compiler" that fails only for sources containing `#error`.
pub const PICKY_COMPILER: &str = r#"
[[compilers]]
name = "picky-cc"
program = "sh"
args = ["-c", "if grep -q '#error' '{input}'; then echo 'error: #error directive' >&2; exit 1; fi; cat '{input}' > '{output}'"]
"#;

/// Builds a configuration with the probe disabled and the given compiler tables.
pub fn config_without_probe(compilers: &[&str]) -> String {
    format!("update_command = []\n{}", compilers.concat())
}

/// Builds a configuration whose update probe prints `status`.
pub fn config_with_probe(status: &str, compilers: &[&str]) -> String {
    format!(
        "update_command = [\"echo\", \"{}\"]\n{}",
        status,
        compilers.concat()
    )
}
