//! # Compile Matrix Execution Module / 编译矩阵执行模块
//!
//! This module runs every configured compiler against one test source. Each
//! compile writes an invocation header and the compiler's own output into a
//! dedicated log file, gets a private output slot that is removed afterwards,
//! and is recorded as a `CompileOutcome`. Compiler failures are outcomes,
//! never errors.
//!
//! 此模块针对一个测试源文件运行所有配置的编译器。每次编译都会将调用头和编译器
//! 自身的输出写入专用日志文件，使用随后会被删除的私有输出槽，并记录为
//! `CompileOutcome`。编译失败是结果，而不是错误。

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::{
    core::{
        classify::classify_outcome,
        config::{CommandSlots, CompilerConfig, RunSettings},
        models::{CellResult, CompileOutcome, FileResult, OutputSlot},
    },
    infra::{
        command::{self, CommandLine},
        fs::{ensure_dir, log_path_for},
        t,
    },
    reporting::console::print_cell,
};

/// Runs every compiler configuration against `test_file`, in configuration order.
///
/// # Arguments
/// * `settings` - The run settings holding the library root, working directory and compilers
/// * `test_file` - The test source, relative to the test root
///
/// # Returns
/// One `CompileOutcome` per compiler configuration
///
/// # Errors
/// Only I/O failures on the log directory or output slots are errors.
pub async fn run_matrix_for_file(
    settings: &RunSettings,
    test_file: &Path,
) -> Result<Vec<CompileOutcome>> {
    let input = settings.test_root().join(test_file);
    let log_dir = settings.log_dir();
    ensure_dir(&log_dir)?;

    let mut outcomes = Vec::with_capacity(settings.matrix.compilers.len());
    for compiler in &settings.matrix.compilers {
        let log_path = log_path_for(&log_dir, test_file, &compiler.name);
        let outcome = run_single_compile(settings, compiler, test_file, &input, &log_path).await?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Compiles one file with one compiler configuration.
async fn run_single_compile(
    settings: &RunSettings,
    compiler: &CompilerConfig,
    test_file: &Path,
    input: &Path,
    log_path: &Path,
) -> Result<CompileOutcome> {
    let slot = OutputSlot::acquire(&settings.working_dir, &settings.matrix.output_name)?;
    let command = compiler.build_command(&CommandSlots {
        include: &settings.library_root,
        output: slot.path(),
        input,
        log: log_path,
    });

    let mut log_file = File::create(log_path)
        .with_context(|| t!("run.log_create_failed", path = log_path.display()).to_string())?;
    write_invocation_header(&mut log_file, &compiler.name, test_file, &command)
        .with_context(|| t!("run.log_write_failed", path = log_path.display()).to_string())?;

    let start_time = Instant::now();
    let termination = command::run_logged(
        &command,
        &settings.working_dir,
        &mut log_file,
        compiler.timeout(),
    )
    .await
    .with_context(|| t!("run.log_write_failed", path = log_path.display()).to_string())?;
    let duration = start_time.elapsed();

    slot.release()?;

    Ok(CompileOutcome {
        compiler: compiler.name.clone(),
        log_path: log_path.to_path_buf(),
        termination,
        duration,
    })
}

/// Writes the header that opens every log: configuration, file, timestamp and command line.
/// 写入每个日志开头的头部：配置、文件、时间戳和命令行。
pub fn write_invocation_header(
    log: &mut impl Write,
    compiler_name: &str,
    test_file: &Path,
    command: &CommandLine,
) -> std::io::Result<()> {
    writeln!(log, "*** configuration: {compiler_name}")?;
    writeln!(log, "*** file: {}", test_file.display())?;
    writeln!(log, "*** started: {}", Local::now().format("%a, %d %b %Y %H:%M:%S %:z"))?;
    writeln!(log, "*** command: {}", command.display())?;
    writeln!(log)?;
    log.flush()
}

/// Runs the matrix for one file, classifies every outcome and prints a line per cell.
/// 为一个文件运行矩阵，对每个结果分类，并为每个单元格打印一行。
pub async fn evaluate_file(settings: &RunSettings, test_file: &Path) -> Result<FileResult> {
    println!(
        "{}",
        t!("run.compiling_file", file = test_file.display()).blue()
    );

    let outcomes = run_matrix_for_file(settings, test_file).await?;
    let mut cells = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let classification = classify_outcome(&outcome)?;
        let cell = CellResult {
            outcome,
            classification,
        };
        print_cell(&cell);
        cells.push(cell);
    }

    Ok(FileResult {
        file: test_file.to_path_buf(),
        cells,
    })
}
