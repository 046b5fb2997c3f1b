//! # Configuration Module / 配置模块
//!
//! The compile matrix configuration, loaded from a TOML file or taken from the
//! built-in defaults, and the per-run settings built from it.
//!
//! 编译矩阵配置（从 TOML 文件加载或使用内置默认值），以及由其构建的单次运行设置。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::command::CommandLine;
use crate::infra::fs::escape_component;
use crate::infra::t;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "CompileMatrix.toml";

/// Slot replaced by the library root (include path) / 由库根目录（包含路径）替换的槽
pub const SLOT_INCLUDE: &str = "include";
/// Slot replaced by the temporary output binary / 由临时输出二进制文件替换的槽
pub const SLOT_OUTPUT: &str = "output";
/// Slot replaced by the test source file / 由测试源文件替换的槽
pub const SLOT_INPUT: &str = "input";
/// Slot replaced by the diagnostic log file / 由诊断日志文件替换的槽
pub const SLOT_LOG: &str = "log";
/// Slot replaced by the library root in update and documentation commands
/// 在更新和文档命令中由库根目录替换的槽
pub const SLOT_LIBRARY: &str = "library";

const COMPILER_SLOTS: &[&str] = &[SLOT_INCLUDE, SLOT_OUTPUT, SLOT_INPUT, SLOT_LOG];
const LIBRARY_SLOTS: &[&str] = &[SLOT_LIBRARY];

/// One column of the matrix: a labelled compiler invocation.
/// 矩阵中的一列：带标签的编译器调用。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// The label used as the report column header and in log file names.
    /// 用作报告列标题和日志文件名的标签。
    pub name: String,
    /// The compiler executable, e.g. `g++-4.4`.
    /// 编译器可执行文件，例如 `g++-4.4`。
    pub program: String,
    /// Arguments, each of which may contain `{include}`, `{output}`, `{input}` and `{log}`.
    /// 参数，每个参数都可以包含 `{include}`、`{output}`、`{input}` 和 `{log}`。
    #[serde(default)]
    pub args: Vec<String>,
    /// An optional limit in seconds. When absent the compile may run forever.
    /// 可选的时间限制（秒）。未设置时编译可以无限期运行。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Concrete values for the slots of a compiler command.
/// 编译器命令中各个槽的具体值。
#[derive(Debug, Clone, Copy)]
pub struct CommandSlots<'a> {
    pub include: &'a Path,
    pub output: &'a Path,
    pub input: &'a Path,
    pub log: &'a Path,
}

impl CompilerConfig {
    /// Builds the argument vector for one compile by filling in the slots.
    /// 通过填充各个槽为单次编译构建参数向量。
    pub fn build_command(&self, slots: &CommandSlots<'_>) -> CommandLine {
        let values = [
            (SLOT_INCLUDE, slots.include),
            (SLOT_OUTPUT, slots.output),
            (SLOT_INPUT, slots.input),
            (SLOT_LOG, slots.log),
        ];
        let args = self
            .args
            .iter()
            .map(|arg| {
                values.iter().fold(arg.clone(), |acc, (slot, value)| {
                    acc.replace(&format!("{{{slot}}}"), &value.to_string_lossy())
                })
            })
            .collect();
        CommandLine::new(self.program.clone(), args)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// The whole compile matrix configuration, loaded from a TOML file.
/// Every field has a default matching the classic igraphhpp regression setup.
///
/// 从 TOML 文件加载的完整编译矩阵配置。
/// 每个字段都有默认值，与经典的 igraphhpp 回归测试设置一致。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// The language for console messages and the report (e.g., "en", "zh-CN").
    /// When absent the system locale is used.
    ///
    /// 控制台消息和报告的语言（例如 "en", "zh-CN"）。未设置时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Heading of the HTML report / HTML 报告的标题
    #[serde(default = "default_title")]
    pub title: String,

    /// Free-text description of the test machine. Defaults to `<os> <arch>`.
    /// 测试机器的自由文本描述。默认为 `<os> <arch>`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Directory of test sources, relative to the library root.
    /// 测试源文件目录，相对于库根目录。
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,

    /// Extension of test sources, without the dot.
    /// 测试源文件的扩展名，不带点。
    #[serde(default = "default_extension")]
    pub extension: String,

    /// File name of the temporary binary each compile writes.
    /// 每次编译写入的临时二进制文件名。
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Snapshot of the last update probe, relative to the working directory.
    /// 上次更新探测的快照，相对于工作目录。
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    /// The HTML report, relative to the working directory.
    /// HTML 报告，相对于工作目录。
    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,

    /// Directory of per-compile logs, relative to the working directory.
    /// 每次编译日志的目录，相对于工作目录。
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Upstream update probe, `[program, args...]`; may use `{library}`. Empty disables the probe.
    /// 上游更新探测命令；可以使用 `{library}`。为空则禁用探测。
    #[serde(default = "default_update_command")]
    pub update_command: Vec<String>,

    /// Documentation generator run in the library root after the report; may use `{library}`.
    /// 报告生成后在库根目录中运行的文档生成器；可以使用 `{library}`。
    #[serde(default)]
    pub doc_command: Vec<String>,

    /// The compiler configurations, in report column order.
    /// 编译器配置，按报告列的顺序排列。
    #[serde(default = "default_compilers")]
    pub compilers: Vec<CompilerConfig>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            language: None,
            title: default_title(),
            environment: None,
            test_dir: default_test_dir(),
            extension: default_extension(),
            output_name: default_output_name(),
            status_file: default_status_file(),
            report_file: default_report_file(),
            log_dir: default_log_dir(),
            update_command: default_update_command(),
            doc_command: Vec::new(),
            compilers: default_compilers(),
        }
    }
}

fn default_title() -> String {
    "igraphhpp regression test".to_string()
}

fn default_test_dir() -> PathBuf {
    PathBuf::from("tests")
}

fn default_extension() -> String {
    "cpp".to_string()
}

fn default_output_name() -> String {
    "tmp.exe".to_string()
}

fn default_status_file() -> PathBuf {
    PathBuf::from("svn_update_last_status.txt")
}

fn default_report_file() -> PathBuf {
    PathBuf::from("compiling_result.html")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("compiler_messages")
}

fn default_update_command() -> Vec<String> {
    vec!["svn".into(), "update".into(), format!("{{{SLOT_LIBRARY}}}")]
}

/// The seven g++ / llvm-g++ configurations the library has always been tested with.
fn default_compilers() -> Vec<CompilerConfig> {
    [
        ("g++-4.4_gnu++0x", "g++-4.4", true),
        ("g++-4.3_gnu++0x", "g++-4.3", true),
        ("g++-4.4", "g++-4.4", false),
        ("g++-4.3", "g++-4.3", false),
        ("g++-4.2", "g++-4.2", false),
        ("g++-4.1", "g++-4.1", false),
        ("llvm-g++-4.2", "llvm-g++", false),
    ]
    .into_iter()
    .map(|(name, program, cxx0x)| gxx_config(name, program, cxx0x))
    .collect()
}

fn gxx_config(name: &str, program: &str, cxx0x: bool) -> CompilerConfig {
    let mut args: Vec<String> = Vec::new();
    if cxx0x {
        args.push("-std=gnu++0x".into());
    }
    args.extend(
        [
            "-Wall",
            "-Wno-unknown-pragmas",
            "-Wno-attributes",
            "-fno-strict-aliasing",
            "-O2",
            "-I{include}",
            "-I/opt/local/include",
            "-ligraph",
            "-lgsl",
            "-lgslcblas",
            "-L/opt/local/lib",
            "-o",
            "{output}",
            "{input}",
        ]
        .map(String::from),
    );
    CompilerConfig {
        name: name.to_string(),
        program: program.to_string(),
        args,
        timeout_secs: None,
    }
}

/// Finds every `{slot}` reference in `text`.
/// A slot name is a non-empty run of lowercase ASCII letters and underscores.
pub fn find_slots(text: &str) -> Vec<&str> {
    let mut slots = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
                    slots.push(name);
                    rest = &after[close + 1..];
                } else {
                    rest = after;
                }
            }
            None => break,
        }
    }
    slots
}

fn check_slots(owner: &str, parts: &[String], allowed: &[&str]) -> Result<()> {
    for part in parts {
        for slot in find_slots(part) {
            if !allowed.contains(&slot) {
                bail!("{}", t!("config.unknown_slot", owner = owner, slot = slot));
            }
        }
    }
    Ok(())
}

impl MatrixConfig {
    /// Checks the configuration for mistakes that would make every compile meaningless.
    /// 检查会让所有编译失去意义的配置错误。
    pub fn validate(&self) -> Result<()> {
        if self.compilers.is_empty() {
            bail!("{}", t!("config.no_compilers"));
        }
        if self.extension().is_empty() {
            bail!("{}", t!("config.empty_extension"));
        }
        if self.output_name.trim().is_empty() {
            bail!("{}", t!("config.empty_output_name"));
        }

        let mut seen = HashSet::new();
        for compiler in &self.compilers {
            if compiler.name.trim().is_empty() {
                bail!("{}", t!("config.empty_compiler_name"));
            }
            // Names must stay distinct once escaped for log file names.
            if !seen.insert(escape_component(&compiler.name)) {
                bail!("{}", t!("config.duplicate_compiler", name = &compiler.name));
            }
            if compiler.program.trim().is_empty() {
                bail!("{}", t!("config.empty_program", name = &compiler.name));
            }
            if !compiler
                .args
                .iter()
                .any(|arg| find_slots(arg).contains(&SLOT_INPUT))
            {
                bail!("{}", t!("config.missing_input_slot", name = &compiler.name));
            }
            check_slots(&compiler.name, &compiler.args, COMPILER_SLOTS)?;
        }

        check_slots("update_command", &self.update_command, LIBRARY_SLOTS)?;
        check_slots("doc_command", &self.doc_command, LIBRARY_SLOTS)?;
        Ok(())
    }

    /// The test source extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }

    /// Expands `~` and environment variables in every program and argument.
    /// 展开所有程序和参数中的 `~` 和环境变量。
    fn expand_env(&mut self) -> Result<()> {
        for compiler in &mut self.compilers {
            compiler.program = expand(&compiler.program)?;
            for arg in &mut compiler.args {
                *arg = expand(arg)?;
            }
        }
        for part in self.update_command.iter_mut().chain(self.doc_command.iter_mut()) {
            *part = expand(part)?;
        }
        Ok(())
    }
}

fn expand(raw: &str) -> Result<String> {
    Ok(shellexpand::full(raw)
        .with_context(|| t!("config.expand_failed", value = raw).to_string())?
        .into_owned())
}

/// Loads, expands and validates a configuration file.
/// 加载、展开并验证配置文件。
pub fn load_matrix_config(path: &Path) -> Result<MatrixConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    let mut config: MatrixConfig =
        toml::from_str(&content).with_context(|| t!("config.parse_failed", path = path.display()).to_string())?;
    config.expand_env()?;
    config.validate()?;
    Ok(config)
}

/// Picks the configuration for a run: an explicit file, else `CompileMatrix.toml`
/// in the working directory, else the built-in matrix.
///
/// 为一次运行选择配置：显式指定的文件，否则为工作目录中的 `CompileMatrix.toml`，
/// 否则为内置矩阵。
///
/// # Returns
/// The configuration and the file it came from, if any.
pub fn resolve_matrix_config(
    working_dir: &Path,
    explicit: Option<&Path>,
) -> Result<(MatrixConfig, Option<PathBuf>)> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = working_dir.join(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        }
    };

    match candidate {
        Some(path) => Ok((load_matrix_config(&path)?, Some(path))),
        None => Ok((MatrixConfig::default(), None)),
    }
}

/// Everything one run needs, built once at start and never mutated.
/// 单次运行所需的一切，在开始时构建一次，之后不再修改。
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Absolute working directory; all outputs land here.
    /// 绝对工作目录；所有输出都位于此处。
    pub working_dir: PathBuf,
    /// Absolute root of the library under test.
    /// 被测库的绝对根目录。
    pub library_root: PathBuf,
    /// Skip the upstream update probe.
    /// 跳过上游更新探测。
    pub force: bool,
    pub matrix: MatrixConfig,
}

impl RunSettings {
    pub fn new(working_dir: PathBuf, library_root: PathBuf, force: bool, matrix: MatrixConfig) -> Self {
        Self {
            working_dir,
            library_root,
            force,
            matrix,
        }
    }

    pub fn test_root(&self) -> PathBuf {
        self.library_root.join(&self.matrix.test_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.working_dir.join(&self.matrix.report_file)
    }

    pub fn status_path(&self) -> PathBuf {
        self.working_dir.join(&self.matrix.status_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.working_dir.join(&self.matrix.log_dir)
    }

    pub fn compiler_names(&self) -> Vec<&str> {
        self.matrix.compilers.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn environment(&self) -> String {
        self.matrix
            .environment
            .clone()
            .unwrap_or_else(|| format!("{} {}", std::env::consts::OS, std::env::consts::ARCH))
    }

    /// The update probe, or `None` when it is disabled.
    pub fn update_command(&self) -> Option<CommandLine> {
        self.library_command(&self.matrix.update_command)
    }

    /// The documentation generator, or `None` when none is configured.
    pub fn doc_command(&self) -> Option<CommandLine> {
        self.library_command(&self.matrix.doc_command)
    }

    fn library_command(&self, parts: &[String]) -> Option<CommandLine> {
        let library = self.library_root.to_string_lossy();
        let slot = format!("{{{SLOT_LIBRARY}}}");
        let filled: Vec<String> = parts.iter().map(|p| p.replace(&slot, &library)).collect();
        CommandLine::from_parts(&filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_slots_ignores_non_slot_braces() {
        assert_eq!(find_slots("-I{include}"), vec!["include"]);
        assert_eq!(find_slots("{output}{input}"), vec!["output", "input"]);
        assert!(find_slots("{}").is_empty());
        assert!(find_slots("{Not-A-Slot}").is_empty());
        assert!(find_slots("open {input").is_empty());
    }

    #[test]
    fn build_command_fills_every_slot() {
        let compiler = CompilerConfig {
            name: "cc".into(),
            program: "cc".into(),
            args: vec![
                "-I{include}".into(),
                "-o".into(),
                "{output}".into(),
                "{input}".into(),
                "--log={log}".into(),
            ],
            timeout_secs: None,
        };
        let command = compiler.build_command(&CommandSlots {
            include: Path::new("/lib"),
            output: Path::new("/tmp/x/tmp.exe"),
            input: Path::new("/lib/tests/a.cpp"),
            log: Path::new("/work/logs/a.log"),
        });
        assert_eq!(command.program, "cc");
        assert_eq!(
            command.args,
            vec!["-I/lib", "-o", "/tmp/x/tmp.exe", "/lib/tests/a.cpp", "--log=/work/logs/a.log"]
        );
    }

    #[test]
    fn defaults_are_valid() {
        let config = MatrixConfig::default();
        config.validate().unwrap();
        assert_eq!(config.compilers.len(), 7);
        assert_eq!(config.compilers[0].name, "g++-4.4_gnu++0x");
        assert_eq!(config.compilers[0].args[0], "-std=gnu++0x");
    }

    #[test]
    fn library_slot_is_filled_in_update_command() {
        let settings = RunSettings::new(
            PathBuf::from("/work"),
            PathBuf::from("/lib"),
            false,
            MatrixConfig::default(),
        );
        let command = settings.update_command().unwrap();
        assert_eq!(command.program, "svn");
        assert_eq!(command.args, vec!["update", "/lib"]);
        assert!(settings.doc_command().is_none());
    }
}
