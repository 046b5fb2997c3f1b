//! # Compile Matrix Library / Compile Matrix 库
//!
//! This library provides the core functionality for the Compile Matrix tool,
//! a configuration-driven regression driver that compiles every test source of
//! a header library against a matrix of compiler configurations.
//!
//! 此库为 Compile Matrix 工具提供核心功能，
//! 这是一个配置驱动的回归测试驱动器，使用一组编译器配置编译头文件库的每个测试源文件。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, data models, classification and the compile matrix runner
//! - `infra` - Infrastructure services like process execution and directory scanning
//! - `reporting` - HTML report rendering and console summaries
//! - `cli` - Command-line interface and the run orchestrator
//!
//! - `core` - 配置、数据模型、结果分类和编译矩阵运行器
//! - `infra` - 基础设施服务，如进程执行和目录扫描
//! - `reporting` - HTML 报告渲染和控制台摘要
//! - `cli` - 命令行接口和运行编排器

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use core::config;
pub use core::models;
pub use core::execution;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    set_language(&locale);
}

/// Sets the active locale, falling back from `zh-CN` to `zh` to `en`.
pub fn set_language(requested: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.iter().any(|l| *l == requested) {
        requested
    } else {
        requested
            .split('-')
            .next()
            .filter(|lang_code| available_locales.iter().any(|l| l == lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
