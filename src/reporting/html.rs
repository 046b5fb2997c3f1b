//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the compile matrix as a static HTML page: one row per
//! test file, one column per compiler configuration, each cell colored by its
//! classification and linked to the compile's log.
//!
//! 此模块将编译矩阵渲染为静态 HTML 页面：每个测试文件一行，每个编译器配置一列，
//! 每个单元格按分类着色并链接到编译日志。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::{FileResult, MatrixSummary};
use crate::infra::fs::relative_link;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Page-level information for the report.
/// 报告的页面级信息。
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Heading of the page / 页面标题
    pub title: &'a str,
    /// When the run started, already formatted / 运行开始时间（已格式化）
    pub generated_at: &'a str,
    /// Last line of the upstream update probe, when it ran / 上游更新探测的最后一行（若已运行）
    pub revision: Option<&'a str>,
    /// Description of the test machine / 测试机器描述
    pub environment: &'a str,
    /// Column headers, in configuration order / 列标题，按配置顺序
    pub compilers: &'a [&'a str],
    /// Directory the report is written to; log links are relative to it
    /// 报告写入的目录；日志链接相对于此目录
    pub report_dir: &'a Path,
}

/// Renders the report document.
///
/// Rows whose cell count differs from the number of compilers are rendered as
/// they are; nothing is padded or dropped.
///
/// 渲染报告文档。单元格数量与编译器数量不同的行按原样渲染。
pub fn render_report(ctx: &ReportContext<'_>, results: &[FileResult]) -> String {
    let summary = MatrixSummary::from_results(results);
    let revision = ctx
        .revision
        .map(str::to_string)
        .unwrap_or_else(|| t!("html_report.revision_not_probed").to_string());

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'><title>{}</title>",
        escape_html(ctx.title)
    ));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style>");
    html.push_str("</head><body>");
    html.push_str(&format!("<h1>{}</h1>", escape_html(ctx.title)));

    html.push_str("<div class='meta'>");
    html.push_str(&format!(
        "{}<br/>",
        t!(
            "html_report.generated",
            time = escape_html(ctx.generated_at),
            revision = escape_html(&revision),
            environment = escape_html(ctx.environment)
        )
    ));
    html.push_str(&format!("{}<br/>", t!("html_report.legend")));
    html.push_str("</div>");

    html.push_str("<div class='summary-container'>");
    for (count, class, label) in [
        (summary.total_cells(), "total-text", t!("html_report.summary.total")),
        (summary.passed, "passed-text", t!("html_report.summary.passed")),
        (summary.warned, "warned-text", t!("html_report.summary.warned")),
        (summary.failed, "failed-text", t!("html_report.summary.failed")),
    ] {
        html.push_str(&format!(
            "<div class='summary-item'><span class='count {class}'>{count}</span><span class='label'>{label}</span></div>"
        ));
    }
    html.push_str("</div>");

    html.push_str("<div><table class='matrix'>");
    html.push_str(&render_header(ctx.compilers));
    for result in results {
        html.push_str(&render_row(result, ctx.report_dir));
    }
    html.push_str("</table></div>");
    html.push_str("</body></html>");
    html
}

fn render_header(compilers: &[&str]) -> String {
    let mut row = String::from("<tr class='header'><td></td>");
    for name in compilers {
        row.push_str(&format!("<td>{}</td>", escape_html(name)));
    }
    row.push_str("</tr>");
    row
}

fn render_row(result: &FileResult, report_dir: &Path) -> String {
    let mut row = format!(
        "<tr><td class='file'>{}</td>",
        escape_html(&result.file.to_string_lossy())
    );
    for cell in &result.cells {
        let href = relative_link(report_dir, &cell.outcome.log_path);
        row.push_str(&format!(
            "<td class='{}'><a href='{}'>{}</a></td>",
            cell.classification.css_class(),
            escape_html(&href),
            escape_html(&cell.marker())
        ));
    }
    row.push_str("</tr>");
    row
}

/// Renders the report and writes it to `output_path`, replacing any previous report.
///
/// 渲染报告并写入 `output_path`，替换之前的报告。
///
/// # Errors
/// This function will return an error if the output file cannot be written.
pub fn generate_html_report(
    ctx: &ReportContext<'_>,
    results: &[FileResult],
    output_path: &Path,
) -> Result<()> {
    let html = render_report(ctx, results);
    fs::write(output_path, html)
        .with_context(|| t!("html_report.write_failed", path = output_path.display()).to_string())?;
    Ok(())
}

/// Simple HTML escape function to replace special characters with their HTML entities
/// 简单的 HTML 转义函数，用 HTML 实体替换特殊字符
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
