//! # Run Command Module / 运行命令模块
//!
//! This module orchestrates one compile matrix run:
//! probe upstream → scan → compile every file with every compiler → write the
//! report → generate documentation.
//!
//! 此模块编排一次编译矩阵运行：
//! 探测上游 → 扫描 → 用每个编译器编译每个文件 → 写入报告 → 生成文档。

use anyhow::{Context, Result, bail};
use chrono::Local;
use colored::*;

use crate::{
    cli::RunArgs,
    core::{
        config::{RunSettings, resolve_matrix_config},
        execution::evaluate_file,
        models::{FileResult, MatrixSummary},
        planner,
        update::{UpdateCheck, probe_upstream},
    },
    infra::{
        command,
        fs::{absolute_path, ensure_dir, is_directory},
        t,
    },
    reporting::{
        console::print_summary,
        html::{ReportContext, generate_html_report},
    },
};

/// How a run ended.
/// 一次运行的结束方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The upstream status was unchanged; nothing was compiled or written.
    /// 上游状态未变化；没有编译或写入任何内容。
    Skipped,
    /// The matrix ran and the report was written.
    /// 矩阵已运行且报告已写入。
    Completed(MatrixSummary),
}

/// Executes a compile matrix run with the provided arguments.
///
/// # Arguments
/// * `args` - Working directory, library root, force flag and optional config file
///
/// # Returns
/// `RunOutcome::Skipped` when the upstream probe saw no change, otherwise the
/// cell counts of the finished run. Failed compiles do not make this an error.
///
/// # Errors
/// Missing directories, an unreadable or invalid configuration and unwritable
/// outputs are fatal.
pub async fn execute(args: RunArgs) -> Result<RunOutcome> {
    let settings = prepare_settings(&args)?;

    let update = probe_upstream(&settings).await?;
    if !update.should_run() {
        println!("{}", t!("update.unchanged").green());
        return Ok(RunOutcome::Skipped);
    }
    if let UpdateCheck::Forced = update {
        println!("{}", t!("update.forced").yellow());
    }

    let started_at = Local::now();
    let plan = planner::plan_run(&settings);

    println!(
        "{}",
        t!(
            "run.plan",
            files = plan.files.len(),
            compilers = settings.matrix.compilers.len(),
            root = plan.test_root.display()
        )
        .bold()
    );
    if plan.ignored_count > 0 {
        println!(
            "{}",
            t!(
                "run.ignored_files",
                count = plan.ignored_count,
                extension = settings.matrix.extension()
            )
            .cyan()
        );
    }

    ensure_dir(&settings.log_dir())?;

    let mut results: Vec<FileResult> = Vec::with_capacity(plan.files.len());
    for file in &plan.files {
        results.push(evaluate_file(&settings, file).await?);
    }

    let summary = MatrixSummary::from_results(&results);
    print_summary(&summary);

    let generated_at = started_at.format("%a, %d %b %Y %H:%M:%S (%:z)").to_string();
    write_report(&settings, &update, &generated_at, &results)?;

    generate_docs(&settings).await;

    Ok(RunOutcome::Completed(summary))
}

/// Resolves directories and the configuration into the settings for this run.
fn prepare_settings(args: &RunArgs) -> Result<RunSettings> {
    if !is_directory(&args.working_dir) {
        bail!(
            "{}",
            t!("run.working_dir_missing", path = args.working_dir.display())
        );
    }
    if !is_directory(&args.library_root) {
        bail!(
            "{}",
            t!("run.library_root_missing", path = args.library_root.display())
        );
    }
    let working_dir = absolute_path(&args.working_dir)?;
    let library_root = absolute_path(&args.library_root)?;

    let (matrix, config_path) = resolve_matrix_config(&working_dir, args.config.as_deref())?;

    if !args.lang_overridden {
        if let Some(language) = &matrix.language {
            crate::set_language(language);
        }
    }

    match &config_path {
        Some(path) => println!(
            "{}",
            t!("run.config_loaded", path = path.display())
        ),
        None => println!("{}", t!("run.config_builtin")),
    }
    println!(
        "{}",
        t!("run.library_root", path = library_root.display())
    );

    Ok(RunSettings::new(working_dir, library_root, args.force, matrix))
}

fn write_report(
    settings: &RunSettings,
    update: &UpdateCheck,
    generated_at: &str,
    results: &[FileResult],
) -> Result<()> {
    let report_path = settings.report_path();
    let compilers = settings.compiler_names();
    let environment = settings.environment();
    let report_dir = report_path
        .parent()
        .unwrap_or(settings.working_dir.as_path());
    ensure_dir(report_dir)?;

    let ctx = ReportContext {
        title: &settings.matrix.title,
        generated_at,
        revision: update.revision(),
        environment: &environment,
        compilers: &compilers,
        report_dir,
    };
    generate_html_report(&ctx, results, &report_path)?;

    println!(
        "\n{}",
        t!("run.report_written", path = report_path.display()).green()
    );
    Ok(())
}

/// Runs the documentation generator, if configured. Its failure is reported but never fatal.
async fn generate_docs(settings: &RunSettings) {
    let Some(doc_command) = settings.doc_command() else {
        return;
    };

    println!(
        "{}",
        t!("docs.running", command = doc_command.display()).blue()
    );
    let result = command::run_inherited(&doc_command, &settings.library_root)
        .await
        .with_context(|| t!("docs.spawn_failed", command = doc_command.display()).to_string());

    match result {
        Ok(status) if status.success() => println!("{}", t!("docs.done").green()),
        Ok(status) => println!("{}", t!("docs.failed", status = status).yellow()),
        Err(e) => println!("{} {:#}", "⚠".yellow(), e),
    }
}
