//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as recursive directory listing and log file naming.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如递归目录列举和日志文件命名。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively lists every regular file below `root`, returning paths relative to `root`.
///
/// When `sub_path` is given, only that subdirectory of `root` is walked, but the
/// returned paths are still relative to `root`. Missing or unreadable directories
/// contribute nothing. Symlinks to files are listed; symlinks to directories are
/// not followed. The order of the result is unspecified.
///
/// 递归列出 `root` 下的所有常规文件，返回相对于 `root` 的路径。
/// 缺失或不可读的目录不产生任何结果，不报告错误。
///
/// # Arguments
/// * `root` - Directory the returned paths are relative to
/// * `sub_path` - Optional subdirectory of `root` to start from
pub fn list_files(root: &Path, sub_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let start = sub_path.map(Path::to_path_buf).unwrap_or_default();
    collect_files(root, &start, &mut files);
    files
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root.join(relative)) else {
        return;
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let entry_relative = relative.join(entry.file_name());

        if file_type.is_dir() {
            collect_files(root, &entry_relative, files);
        } else if file_type.is_file() {
            files.push(entry_relative);
        } else if file_type.is_symlink() {
            // Only symlinked files count; directory links could form cycles.
            if fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()) {
                files.push(entry_relative);
            }
        }
    }
}

/// Escapes `raw` for use inside a file name.
///
/// ASCII letters, digits, `-` and `.` are kept; every other byte becomes `_XX`
/// (uppercase hex). Since `_` is always followed by two hex digits, an escaped
/// component never contains `__`, and distinct inputs give distinct outputs.
///
/// 转义 `raw` 以用于文件名。ASCII 字母、数字、`-` 和 `.` 保持不变；
/// 其他每个字节都变为 `_XX`（大写十六进制）。不同的输入总是得到不同的输出。
pub fn escape_component(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("_{byte:02X}"));
        }
    }
    escaped
}

/// Path of the diagnostic log for one (test file, compiler configuration) pair.
///
/// The test file is rendered with `/` separators on every platform before it is
/// escaped, and the two escaped parts are joined by `__`, which neither part can
/// contain. Every pair therefore gets its own log.
///
/// # Example
/// `examples/example1.cpp` compiled by `g++-4.4` logs to
/// `<log_dir>/examples_2Fexample1.cpp__g_2B_2B-4.4.log`.
pub fn log_path_for(log_dir: &Path, test_file: &Path, compiler_name: &str) -> PathBuf {
    let file_part = escape_component(&slash_path(test_file));
    let compiler_part = escape_component(compiler_name);
    log_dir.join(format!("{file_part}__{compiler_part}.log"))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Expresses `target` as a link relative to `base`, with `/` separators.
/// Falls back to the full path when `target` is not below `base`.
pub fn relative_link(base: &Path, target: &Path) -> String {
    match target.strip_prefix(base) {
        Ok(relative) => slash_path(relative),
        Err(_) => target.to_string_lossy().replace('\\', "/"),
    }
}

/// Creates `path` and all of its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Gets the absolute path from a potentially relative path.
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_keeps_dots_and_dashes() {
        assert_eq!(escape_component("clang-3.9"), "clang-3.9");
        assert_eq!(escape_component("g++-4.4_gnu++0x"), "g_2B_2B-4.4_5Fgnu_2B_2B0x");
        assert_eq!(escape_component("examples/a b.cpp"), "examples_2Fa_20b.cpp");
    }

    #[test]
    fn log_path_combines_file_and_compiler() {
        let path = log_path_for(Path::new("logs"), Path::new("sub/t.cpp"), "clang");
        assert_eq!(path, Path::new("logs").join("sub_2Ft.cpp__clang.log"));
    }

    #[test]
    fn log_paths_do_not_collide() {
        let logs = Path::new("logs");
        let pairs = [
            ("sub/x.cpp", "cc"),
            ("sub_x.cpp", "cc"),
            ("sub_2Fx.cpp", "cc"),
            ("a.cpp", "c++"),
            ("a.cpp", "c__"),
            ("a.cpp", "_b"),
            ("a_.cpp", "b"),
        ];

        let paths: std::collections::HashSet<PathBuf> = pairs
            .iter()
            .map(|(file, compiler)| log_path_for(logs, Path::new(file), compiler))
            .collect();

        assert_eq!(paths.len(), pairs.len());
    }

    #[test]
    fn relative_link_strips_base() {
        let base = Path::new("/work");
        assert_eq!(
            relative_link(base, Path::new("/work/logs/a.log")),
            "logs/a.log"
        );
    }

    #[cfg(unix)]
    #[test]
    fn relative_link_keeps_foreign_paths_absolute() {
        let link = relative_link(Path::new("/work"), Path::new("/elsewhere/a.log"));
        assert_eq!(link, "/elsewhere/a.log");
    }
}
