//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Compile Matrix,
//! including configuration, data models, result classification,
//! run planning, the upstream update probe and the compile matrix runner.
//!
//! 此模块包含 Compile Matrix 的核心功能，
//! 包括配置、数据模型、结果分类、运行计划、上游更新探测和编译矩阵运行器。

pub mod classify;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod update;

// Re-exports
pub use classify::{classify, Classification};
pub use config::{MatrixConfig, RunSettings};
pub use execution::run_matrix_for_file;
