//! # Commands / 命令
//!
//! - `run` - The compile matrix orchestrator / 编译矩阵编排器
//! - `config` - Printing the built-in configuration / 打印内置配置

pub mod config;
pub mod run;
