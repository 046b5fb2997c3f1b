//! # Console Reporting Module / 控制台报告模块
//!
//! Colored progress lines for each compile and the final run summary.
//!
//! 每次编译的彩色进度行以及最终的运行摘要。

use colored::*;

use crate::core::classify::Classification;
use crate::core::models::{CellResult, MatrixSummary};
use crate::infra::t;

/// Prints one line for a classified compile.
///
/// # Output Format / 输出格式
/// ```text
///   - g++-4.4_gnu++0x          | PASS       |      1.23s
///   - llvm-g++-4.2             | 1          |      0.45s
/// ```
pub fn print_cell(cell: &CellResult) {
    let marker = cell.marker();
    let marker_colored = match cell.classification {
        Classification::Pass => marker.green(),
        Classification::Warn => marker.yellow(),
        Classification::Fail => marker.red(),
    };
    let duration_str = format!("{:.2}s", cell.outcome.duration.as_secs_f64());

    println!(
        "  - {:<24} | {:<10} | {:>10}",
        cell.outcome.compiler, marker_colored, duration_str
    );
}

/// Prints the cell counts of a finished run.
/// 打印已完成运行的单元格计数。
pub fn print_summary(summary: &MatrixSummary) {
    println!("\n{}", t!("summary.banner").bold());
    println!("  {}", t!("summary.files", count = summary.files));
    println!(
        "  {}",
        t!("summary.passed", count = summary.passed).green()
    );
    println!(
        "  {}",
        t!("summary.warned", count = summary.warned).yellow()
    );

    let failed = t!("summary.failed", count = summary.failed);
    if summary.failed > 0 {
        println!("  {}", failed.red().bold());
    } else {
        println!("  {}", failed);
    }
}
