//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout Compile Matrix:
//! how a compiler process ended, the outcome of one (compiler, file) compile,
//! classified report cells, per-file rows and the output slot guard.
//!
//! 此模块定义了整个 Compile Matrix 中使用的核心数据结构：
//! 编译进程如何结束、单次（编译器，文件）编译的结果、已分类的报告单元格、
//! 每个文件的行以及输出槽守卫。

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use crate::core::classify::Classification;
use crate::infra::t;

/// How a compiler process ended.
/// 编译器进程的结束方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited normally with this code.
    /// 进程以此退出码正常退出。
    Exited(i32),
    /// The process was killed by a signal.
    /// 进程被信号终止。
    Signalled,
    /// The process ran past its configured timeout and was killed.
    /// 进程超出配置的超时时间并被终止。
    TimedOut,
    /// The program could not be started at all.
    /// 程序根本无法启动。
    SpawnFailed,
}

impl Termination {
    /// The exit code, when the process exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Termination::Exited(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }

    /// Short marker shown in failed report cells.
    /// 在失败的报告单元格中显示的简短标记。
    pub fn marker(&self) -> String {
        match self {
            Termination::Exited(code) => code.to_string(),
            Termination::Signalled => t!("report.cell_signal").to_string(),
            Termination::TimedOut => t!("report.cell_timeout").to_string(),
            Termination::SpawnFailed => t!("report.cell_error").to_string(),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit status {code}"),
            Termination::Signalled => write!(f, "killed by signal"),
            Termination::TimedOut => write!(f, "timed out"),
            Termination::SpawnFailed => write!(f, "could not be started"),
        }
    }
}

/// The result of running one compiler configuration against one test file.
/// 针对一个测试文件运行一个编译器配置的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// Name of the compiler configuration / 编译器配置名称
    pub compiler: String,
    /// Log file holding the invocation header and the compiler's output
    /// 保存调用头和编译器输出的日志文件
    pub log_path: PathBuf,
    /// How the compiler process ended / 编译器进程的结束方式
    pub termination: Termination,
    /// Wall-clock time of the compile / 编译的实际耗时
    pub duration: Duration,
}

impl CompileOutcome {
    pub fn exit_code(&self) -> Option<i32> {
        self.termination.exit_code()
    }
}

/// A compile outcome together with its classification; one cell of the report.
/// 编译结果及其分类；报告中的一个单元格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellResult {
    pub outcome: CompileOutcome,
    pub classification: Classification,
}

impl CellResult {
    /// Text shown inside the report cell.
    /// 报告单元格中显示的文本。
    pub fn marker(&self) -> String {
        match self.classification {
            Classification::Pass => t!("report.cell_pass").to_string(),
            Classification::Warn => t!("report.cell_warn").to_string(),
            Classification::Fail => self.outcome.termination.marker(),
        }
    }
}

/// All classified outcomes for one test file, in compiler configuration order.
/// 一个测试文件的所有已分类结果，按编译器配置顺序排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// Path of the test file relative to the test root / 相对于测试根目录的测试文件路径
    pub file: PathBuf,
    pub cells: Vec<CellResult>,
}

/// Cell counts over a whole run.
/// 整次运行的单元格计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixSummary {
    pub files: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl MatrixSummary {
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut summary = MatrixSummary {
            files: results.len(),
            ..Default::default()
        };
        for cell in results.iter().flat_map(|r| r.cells.iter()) {
            match cell.classification {
                Classification::Pass => summary.passed += 1,
                Classification::Warn => summary.warned += 1,
                Classification::Fail => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total_cells(&self) -> usize {
        self.passed + self.warned + self.failed
    }
}

/// A scoped output location for one compile attempt.
///
/// Each slot lives in its own uniquely named temporary directory inside the
/// working directory. The directory, along with whatever binary the compiler
/// produced, is deleted when the slot is dropped or released.
///
/// 单次编译尝试的作用域输出位置。
/// 每个槽位于工作目录中唯一命名的临时目录内。
/// 当槽被丢弃或释放时，该目录以及编译器生成的二进制文件都会被删除。
pub struct OutputSlot {
    /// The `TempDir` guard. When this goes out of scope, the directory on disk is deleted.
    /// `TempDir` 的 guard。当它超出作用域时，磁盘上的目录将被删除。
    temp_root: TempDir,
    path: PathBuf,
}

impl OutputSlot {
    /// Acquires a fresh slot under `parent`; the binary will be called `output_name`.
    pub fn acquire(parent: &Path, output_name: &str) -> Result<Self> {
        let temp_root = tempfile::Builder::new()
            .prefix(".compile-matrix-")
            .tempdir_in(parent)
            .with_context(|| {
                format!(
                    "Failed to create a temporary output directory in {}",
                    parent.display()
                )
            })?;
        let path = temp_root.path().join(output_name);
        Ok(Self { temp_root, path })
    }

    /// Path the compiler should write its binary to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the slot now, surfacing any error instead of ignoring it on drop.
    pub fn release(self) -> Result<()> {
        let dir = self.temp_root.path().to_path_buf();
        self.temp_root
            .close()
            .with_context(|| format!("Failed to remove output slot {}", dir.display()))
    }
}

impl fmt::Debug for OutputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSlot")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(classification: Classification, termination: Termination) -> CellResult {
        CellResult {
            outcome: CompileOutcome {
                compiler: "cc".to_string(),
                log_path: PathBuf::from("cc.log"),
                termination,
                duration: Duration::from_millis(5),
            },
            classification,
        }
    }

    #[test]
    fn summary_counts_every_cell() {
        let results = vec![
            FileResult {
                file: PathBuf::from("a.cpp"),
                cells: vec![
                    cell(Classification::Pass, Termination::Exited(0)),
                    cell(Classification::Fail, Termination::Exited(1)),
                ],
            },
            FileResult {
                file: PathBuf::from("b.cpp"),
                cells: vec![
                    cell(Classification::Warn, Termination::Exited(0)),
                    cell(Classification::Fail, Termination::TimedOut),
                ],
            },
        ];

        let summary = MatrixSummary::from_results(&results);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.warned, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total_cells(), 4);
    }

    #[test]
    fn failed_cell_marker_shows_exit_code() {
        assert_eq!(cell(Classification::Fail, Termination::Exited(3)).marker(), "3");
    }

    #[test]
    fn output_slot_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let slot_dir;
        {
            let slot = OutputSlot::acquire(parent.path(), "tmp.exe").unwrap();
            slot_dir = slot.path().parent().unwrap().to_path_buf();
            std::fs::write(slot.path(), b"binary").unwrap();
            assert!(slot_dir.exists());
        }
        assert!(!slot_dir.exists());
    }

    #[test]
    fn output_slots_are_unique() {
        let parent = tempfile::tempdir().unwrap();
        let first = OutputSlot::acquire(parent.path(), "tmp.exe").unwrap();
        let second = OutputSlot::acquire(parent.path(), "tmp.exe").unwrap();
        assert_ne!(first.path(), second.path());
        first.release().unwrap();
        second.release().unwrap();
    }
}
