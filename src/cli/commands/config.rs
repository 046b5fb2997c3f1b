//! # Config Command Module / 配置命令模块
//!
//! Prints the built-in compile matrix as TOML, ready to be saved as
//! `CompileMatrix.toml` and edited.
//!
//! 以 TOML 格式打印内置编译矩阵，可保存为 `CompileMatrix.toml` 后编辑。

use anyhow::{Context, Result};

use crate::core::config::{DEFAULT_CONFIG_FILE, MatrixConfig};
use crate::infra::t;

/// Renders the built-in configuration with a short header comment.
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&MatrixConfig::default())
        .with_context(|| t!("config.serialize_failed").to_string())?;
    Ok(format!(
        "# {}\n\n{}",
        t!("config.dump_header", file = DEFAULT_CONFIG_FILE),
        body
    ))
}

/// Prints the built-in configuration to stdout.
pub fn print_default_config() -> Result<()> {
    print!("{}", default_config_toml()?);
    Ok(())
}
