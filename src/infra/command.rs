//! # Command Execution Module / 命令执行模块
//!
//! Typed command lines and the three ways Compile Matrix runs external programs:
//! with output redirected into a log file, with stdout captured, and with
//! inherited stdio.
//!
//! 类型化的命令行，以及 Compile Matrix 运行外部程序的三种方式：
//! 输出重定向到日志文件、捕获 stdout、继承标准输入输出。

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use crate::core::models::Termination;
use crate::infra::t;

/// A program plus its argument vector. No shell is involved when it runs.
/// 程序及其参数向量。运行时不经过 shell。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a command line from `[program, args...]`. Returns `None` for an empty list.
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// Renders the command line the way a shell user would type it.
    /// 以 shell 用户输入的方式呈现命令行。
    pub fn display(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    fn to_command(&self, cwd: &Path) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).current_dir(cwd).kill_on_drop(true);
        cmd
    }
}

/// Runs a command with stdout and stderr redirected into `log_file`.
///
/// Only the termination of the process is observed in-process; the diagnostic
/// text lands in the log. A program that cannot be spawned, a signal and an
/// elapsed `timeout` are all reported as a `Termination`, with a short note
/// appended to the log, rather than as an error.
///
/// 运行命令，并将 stdout 和 stderr 重定向到 `log_file`。
/// 进程内只观察进程的终止状态；诊断文本写入日志。
/// 无法启动、被信号终止和超时都作为 `Termination` 返回，而不是错误。
///
/// On timeout only the spawned process itself is killed. Processes it started
/// in turn, such as the children of a `sh -c` wrapper, are left running and may
/// still append to the log; the call returns without waiting for them.
///
/// 超时时只终止直接启动的进程。它再启动的进程（例如 `sh -c` 包装脚本的子进程）
/// 会继续运行，并可能继续写入日志；本函数不会等待它们。
///
/// # Errors
/// Only I/O failures on the log file itself (or while waiting on the child) are errors.
pub async fn run_logged(
    command: &CommandLine,
    cwd: &Path,
    log_file: &mut File,
    timeout: Option<Duration>,
) -> std::io::Result<Termination> {
    let stdout = log_file.try_clone()?;
    let stderr = log_file.try_clone()?;

    let mut cmd = command.to_command(cwd);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            writeln!(
                log_file,
                "{}",
                t!("command.spawn_failed", program = &command.program, error = e)
            )?;
            return Ok(Termination::SpawnFailed);
        }
    };

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                child.kill().await?;
                writeln!(
                    log_file,
                    "{}",
                    t!("command.timed_out", seconds = limit.as_secs())
                )?;
                return Ok(Termination::TimedOut);
            }
        },
        None => child.wait().await?,
    };

    Ok(match status.code() {
        Some(code) => Termination::Exited(code),
        None => Termination::Signalled,
    })
}

/// Runs a command and captures its raw stdout. stderr is passed through to the console.
/// 运行命令并捕获原始 stdout。stderr 直接输出到控制台。
pub async fn capture_stdout(
    command: &CommandLine,
    cwd: &Path,
) -> std::io::Result<(ExitStatus, Vec<u8>)> {
    let output = command
        .to_command(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .await?;
    Ok((output.status, output.stdout))
}

/// Runs a command with inherited stdio and waits for it.
/// 以继承的标准输入输出运行命令并等待其结束。
pub async fn run_inherited(command: &CommandLine, cwd: &Path) -> std::io::Result<ExitStatus> {
    command.to_command(cwd).status().await
}
