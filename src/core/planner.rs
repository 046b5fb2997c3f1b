//! # Run Planning Module / 运行计划模块
//!
//! This module decides which test sources a run compiles: it scans the test
//! root, keeps the files with the configured extension and orders them.
//!
//! 此模块决定一次运行要编译哪些测试源文件：扫描测试根目录，
//! 保留具有配置扩展名的文件并对其排序。

use std::path::{Path, PathBuf};

use crate::core::config::RunSettings;
use crate::infra::fs::list_files;

/// Represents the set of test files one run will compile.
/// 表示一次运行将要编译的测试文件集合。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Absolute directory the test files are relative to.
    /// 测试文件路径所相对的绝对目录。
    pub test_root: PathBuf,
    /// Test files relative to `test_root`, sorted.
    /// 相对于 `test_root` 的测试文件，已排序。
    pub files: Vec<PathBuf>,
    /// The number of scanned files skipped for having another extension.
    /// 因扩展名不同而被跳过的扫描文件数量。
    pub ignored_count: usize,
}

/// Checks whether `path` ends in `.extension`. The comparison is case-sensitive.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Splits scanned files into those with `extension` and the number of others.
pub fn filter_by_extension(files: Vec<PathBuf>, extension: &str) -> (Vec<PathBuf>, usize) {
    let (matching, others): (Vec<_>, Vec<_>) = files
        .into_iter()
        .partition(|file| has_extension(file, extension));
    (matching, others.len())
}

/// Creates the plan for a run: every test source below the test root, sorted by path.
/// 为一次运行创建计划：测试根目录下的所有测试源文件，按路径排序。
pub fn plan_run(settings: &RunSettings) -> RunPlan {
    let test_root = settings.test_root();
    let (mut files, ignored_count) =
        filter_by_extension(list_files(&test_root, None), settings.matrix.extension());

    // Sort files by path for a deterministic report
    files.sort();

    RunPlan {
        test_root,
        files,
        ignored_count,
    }
}
