//! # Upstream Update Probe Module / 上游更新探测模块
//!
//! Runs the configured update command (for example `svn update`) and compares its
//! output with the snapshot recorded by the previous run. Identical output means
//! nothing changed upstream and the run can be skipped.
//!
//! 运行配置的更新命令（例如 `svn update`），并将其输出与上次运行记录的快照进行比较。
//! 输出相同意味着上游没有变化，可以跳过本次运行。

use anyhow::{Context, Result};
use colored::*;
use std::fs;

use crate::core::config::RunSettings;
use crate::infra::{command, t};

/// What the update probe found.
/// 更新探测的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// The probe was skipped because the run was forced.
    /// 因强制运行而跳过探测。
    Forced,
    /// No update command is configured.
    /// 未配置更新命令。
    NotConfigured,
    /// The probe output differs from the last snapshot.
    /// 探测输出与上次快照不同。
    Changed { status: String },
    /// The probe output is byte-identical to the last snapshot.
    /// 探测输出与上次快照逐字节相同。
    Unchanged { status: String },
}

impl UpdateCheck {
    /// Whether the run should go ahead.
    pub fn should_run(&self) -> bool {
        !matches!(self, UpdateCheck::Unchanged { .. })
    }

    /// The revision marker shown in the report, if the probe ran.
    pub fn revision(&self) -> Option<&str> {
        match self {
            UpdateCheck::Changed { status } | UpdateCheck::Unchanged { status } => {
                revision_marker(status)
            }
            _ => None,
        }
    }
}

/// The last non-empty line of the probe output, e.g. `At revision 231.`
/// 探测输出的最后一个非空行，例如 `At revision 231.`
pub fn revision_marker(status: &str) -> Option<&str> {
    status.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

/// Runs the update probe unless the run is forced or no probe is configured.
///
/// The previous snapshot is read from the status file (a missing file counts as
/// empty), the probe's stdout replaces it, and the two are compared byte for byte.
/// A probe that exits non-zero or cannot be started at all is reported but does
/// not stop the run; in the latter case its output counts as empty.
///
/// 除非强制运行或未配置探测，否则运行更新探测。
/// 从状态文件读取上次快照（文件缺失视为空），用探测的 stdout 替换它，并逐字节比较两者。
///
/// # Errors
/// Fails only when the status file cannot be written.
pub async fn probe_upstream(settings: &RunSettings) -> Result<UpdateCheck> {
    if settings.force {
        return Ok(UpdateCheck::Forced);
    }
    let Some(update_command) = settings.update_command() else {
        return Ok(UpdateCheck::NotConfigured);
    };

    let status_path = settings.status_path();
    let previous = fs::read(&status_path).unwrap_or_default();

    println!(
        "{}",
        t!("update.probing", command = update_command.display()).blue()
    );
    let current = match command::capture_stdout(&update_command, &settings.working_dir).await {
        Ok((exit_status, stdout)) => {
            if !exit_status.success() {
                println!(
                    "{}",
                    t!("update.probe_failed", status = exit_status).yellow()
                );
            }
            stdout
        }
        Err(e) => {
            println!(
                "{} {}: {}",
                "⚠".yellow(),
                t!("update.spawn_failed", command = update_command.display()).yellow(),
                e
            );
            Vec::new()
        }
    };

    fs::write(&status_path, &current)
        .with_context(|| t!("update.write_failed", path = status_path.display()).to_string())?;

    let status = String::from_utf8_lossy(&current).into_owned();
    if previous == current {
        Ok(UpdateCheck::Unchanged { status })
    } else {
        Ok(UpdateCheck::Changed { status })
    }
}
