//! # Command Line Interface / 命令行接口
//!
//! `compile-matrix [OPTIONS] <working_directory> <library_root_directory> [force]`
//!
//! Any third positional argument (conventionally `force`) skips the upstream
//! update probe. Any other number of positional arguments prints the usage
//! text and exits successfully.
//!
//! 任意第三个位置参数（通常为 `force`）都会跳过上游更新探测。
//! 位置参数数量不符时打印用法说明并以成功状态退出。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

/// Arguments of a compile matrix run.
/// 一次编译矩阵运行的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Directory receiving the report, logs and status snapshot / 接收报告、日志和状态快照的目录
    pub working_dir: PathBuf,
    /// Root of the library under test / 被测库的根目录
    pub library_root: PathBuf,
    /// Skip the upstream update probe / 跳过上游更新探测
    pub force: bool,
    /// Explicit configuration file / 显式指定的配置文件
    pub config: Option<PathBuf>,
    /// Whether `--lang` was given; it then wins over the configured language
    /// 是否给出了 `--lang`；若给出则优先于配置的语言
    pub lang_overridden: bool,
}

/// What the command line asks for.
/// 命令行请求的操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(RunArgs),
    DumpConfig,
    Usage,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

/// Builds the clap command with localized help texts.
pub fn build_cli() -> Command {
    Command::new("compile-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .override_usage(t!("cli.usage_line").to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("cli.config").to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("dump-config")
                .long("dump-config")
                .help(t!("cli.dump_config").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("positionals")
                .help(t!("cli.positionals").to_string())
                .value_name("ARGS")
                .num_args(0..)
                .action(ArgAction::Append),
        )
}

/// Interprets parsed arguments. Only the positional count matters: two runs with
/// the probe, three runs forced whatever the third value is, anything else
/// yields `Invocation::Usage`.
///
/// 解析参数。只看位置参数的数量：两个时带探测运行，三个时无论第三个值是什么都强制运行，
/// 其他数量返回 `Invocation::Usage`。
pub fn parse_invocation(matches: &ArgMatches) -> Invocation {
    if matches.get_flag("dump-config") {
        return Invocation::DumpConfig;
    }

    let positionals: Vec<&String> = matches
        .get_many::<String>("positionals")
        .map(|values| values.collect())
        .unwrap_or_default();

    let force = match positionals.len() {
        2 => false,
        3 => true,
        _ => return Invocation::Usage,
    };

    Invocation::Run(RunArgs {
        working_dir: PathBuf::from(positionals[0]),
        library_root: PathBuf::from(positionals[1]),
        force,
        config: matches.get_one::<PathBuf>("config").cloned(),
        lang_overridden: matches.contains_id("lang"),
    })
}

/// Prints the usage text for a malformed invocation.
pub fn print_usage() {
    println!("{}", t!("cli.usage"));
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    match pre_parse_language() {
        Some(language) => crate::set_language(&language),
        None => crate::init(),
    }

    let matches = build_cli().get_matches();

    match parse_invocation(&matches) {
        Invocation::Run(args) => {
            commands::run::execute(args).await?;
        }
        Invocation::DumpConfig => {
            commands::config::print_default_config()?;
        }
        Invocation::Usage => print_usage(),
    }
    Ok(())
}
