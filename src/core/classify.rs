//! # Result Classification Module / 结果分类模块
//!
//! Turns a compiler's exit status and diagnostic text into a report classification.
//!
//! 将编译器的退出状态和诊断文本转换为报告分类。

use anyhow::{Context, Result};
use std::fs;

use crate::core::models::CompileOutcome;

/// Marker searched for, case-insensitively, in the log of a successful compile.
pub const WARNING_MARKER: &str = "warning:";

/// Classification of one compile outcome.
/// 单次编译结果的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Compiled cleanly / 编译干净通过
    Pass,
    /// Compiled, but the compiler emitted warnings / 编译通过，但编译器发出了警告
    Warn,
    /// Did not compile / 编译失败
    Fail,
}

impl Classification {
    /// CSS class of the report cell.
    pub fn css_class(&self) -> &'static str {
        match self {
            Classification::Pass => "pass",
            Classification::Warn => "warn",
            Classification::Fail => "fail",
        }
    }
}

/// Classifies an exit code and the log text of the compile.
///
/// Anything but exit code `0` is `Fail`, whatever the log says. A successful
/// compile whose log mentions `warning:` in any letter case is `Warn`.
///
/// 除退出码 `0` 以外的任何情况都是 `Fail`，与日志内容无关。
/// 成功的编译若日志中出现（不区分大小写的）`warning:`，则为 `Warn`。
pub fn classify(exit_code: Option<i32>, log_text: &str) -> Classification {
    match exit_code {
        Some(0) if contains_warning(log_text) => Classification::Warn,
        Some(0) => Classification::Pass,
        _ => Classification::Fail,
    }
}

fn contains_warning(text: &str) -> bool {
    text.to_ascii_lowercase().contains(WARNING_MARKER)
}

/// Classifies an outcome, reading its log only when the compile succeeded.
pub fn classify_outcome(outcome: &CompileOutcome) -> Result<Classification> {
    if !outcome.termination.is_success() {
        return Ok(Classification::Fail);
    }
    let raw = fs::read(&outcome.log_path)
        .with_context(|| format!("Failed to read log {}", outcome.log_path.display()))?;
    Ok(classify(outcome.exit_code(), &String::from_utf8_lossy(&raw)))
}
