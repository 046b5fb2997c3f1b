//! # Reporting Module / 报告模块
//!
//! This module handles the rendering of the HTML compile matrix report and the
//! colorful console progress lines and summary.
//!
//! 此模块处理 HTML 编译矩阵报告的渲染，以及彩色的控制台进度行和摘要。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_cell, print_summary};
pub use html::{generate_html_report, render_report, ReportContext};
