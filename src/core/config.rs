//! # Configuration Module / 配置模块
//!
//! Two layers: [`RunnerConfig`] is the optional `ShardRunner.toml` file, and
//! [`RunSettings`] is the fully resolved set of values a run works with
//! (command-line flags over file values over built-in defaults).
//!
//! 两层配置：[`RunnerConfig`] 是可选的 `ShardRunner.toml` 文件，
//! [`RunSettings`] 是一次运行所使用的完全解析后的值
//! （命令行参数优先于文件值，文件值优先于内置默认值）。

use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::core::error::ShardError;
use crate::core::synthesis::validate_output_path;

/// Default name of the configuration file.
/// 配置文件的默认名称。
pub const DEFAULT_CONFIG_FILE: &str = "ShardRunner.toml";

/// Default test file suffix.
pub const DEFAULT_SUFFIX: &str = "Test.php";

/// Default engine command.
pub const DEFAULT_ENGINE: &str = "vendor/bin/phpunit";

/// Workers started per available CPU when no count is configured.
pub const WORKERS_PER_CPU: usize = 3;

/// Represents the optional configuration file, loaded from TOML.
/// Every field has a default, so an empty file is valid.
///
/// 代表从 TOML 加载的可选配置文件。每个字段都有默认值，因此空文件也是有效的。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default)]
    pub language: Option<String>,

    /// The engine command line each worker runs.
    /// 每个工作进程运行的引擎命令行。
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Extra arguments passed to the engine before the shard selection.
    /// 在分片选择参数之前传递给引擎的额外参数。
    #[serde(default)]
    pub engine_args: Vec<String>,

    /// Test file name suffix.
    /// 测试文件名后缀。
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Number of shards / workers. Defaults to available parallelism times three.
    /// 分片/工作进程数量。默认为可用并行度的三倍。
    #[serde(default)]
    pub workers: Option<usize>,

    /// Exit code reported when at least one shard fails.
    /// 至少一个分片失败时报告的退出码。
    #[serde(default)]
    pub failure_exit_code: Option<u8>,

    /// Where run artifacts live. Defaults to the system temp directory.
    /// 运行产物的存放位置。默认为系统临时目录。
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: None,
            engine: default_engine(),
            engine_args: Vec::new(),
            suffix: default_suffix(),
            workers: None,
            failure_exit_code: None,
            scratch_dir: None,
        }
    }
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

/// Loads a configuration file.
///
/// # Errors
/// Returns [`ShardError::Io`] if the file cannot be read and
/// [`ShardError::Configuration`] if it is not valid TOML for [`RunnerConfig`].
pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, ShardError> {
    let content = fs::read_to_string(path)
        .map_err(|err| ShardError::io(format!("failed to read '{}'", path.display()), err))?;
    toml::from_str(&content).map_err(|err| {
        ShardError::Configuration(format!("failed to parse '{}': {err}", path.display()))
    })
}

/// Loads the configuration at `explicit`, or `ShardRunner.toml` in `dir` if it
/// exists, or the defaults.
///
/// # Errors
/// An explicitly named file must exist and parse; the implicit one only has to
/// parse if present.
pub fn resolve_runner_config(explicit: Option<&Path>, dir: &Path) -> Result<RunnerConfig, ShardError> {
    if let Some(path) = explicit {
        return load_runner_config(path);
    }
    let implicit = dir.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        load_runner_config(&implicit)
    } else {
        Ok(RunnerConfig::default())
    }
}

/// Default worker count: available parallelism times [`WORKERS_PER_CPU`].
pub fn default_workers() -> usize {
    num_cpus::get().max(1) * WORKERS_PER_CPU
}

/// Checks a worker count from either the command line or the config file.
///
/// # Errors
/// Returns [`ShardError::Configuration`] for zero.
pub fn worker_count(workers: usize) -> Result<NonZeroUsize, ShardError> {
    NonZeroUsize::new(workers)
        .ok_or_else(|| ShardError::Configuration("worker count must be at least 1".to_string()))
}

/// The resolved values one run works with.
/// 一次运行所使用的已解析值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Suite to shard.
    pub suite: String,
    /// Path of the suite declaration to read.
    pub declaration: PathBuf,
    /// Where the synthesized configuration goes; `None` picks a run-scoped temp path.
    pub output: Option<PathBuf>,
    /// Number of shards, one worker each.
    pub workers: NonZeroUsize,
    /// Test file suffix used where a directory does not set its own.
    pub suffix: String,
    /// Engine command line.
    pub engine: String,
    /// Extra engine arguments.
    pub engine_args: Vec<String>,
    /// Auto-prepend hook forwarded to every worker.
    pub prepend: Option<PathBuf>,
    /// Print the planned worker invocations instead of running them.
    pub dry_run: bool,
    /// Overrides the failure exit code.
    pub failure_exit_code: Option<u8>,
    /// Working directory of the workers.
    pub project_dir: PathBuf,
}

impl RunSettings {
    /// Settings for `suite` in `declaration` with every other value at its default.
    pub fn new(suite: impl Into<String>, declaration: impl Into<PathBuf>) -> Self {
        let workers = NonZeroUsize::new(default_workers()).unwrap_or(NonZeroUsize::MIN);
        Self {
            suite: suite.into(),
            declaration: declaration.into(),
            output: None,
            workers,
            suffix: DEFAULT_SUFFIX.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            engine_args: Vec::new(),
            prepend: None,
            dry_run: false,
            failure_exit_code: None,
            project_dir: PathBuf::from("."),
        }
    }

    /// Fills every value not given on the command line from the config file.
    ///
    /// # Errors
    /// Returns [`ShardError::Configuration`] for `workers = 0`.
    pub fn apply_config(&mut self, config: &RunnerConfig) -> Result<(), ShardError> {
        self.suffix = config.suffix.clone();
        self.engine = config.engine.clone();
        self.engine_args = config.engine_args.clone();
        if let Some(workers) = config.workers {
            self.workers = worker_count(workers)?;
        }
        self.failure_exit_code = config.failure_exit_code;
        Ok(())
    }

    /// Rejects settings no run could succeed with. Called before any
    /// discovery work starts.
    ///
    /// # Errors
    /// Returns [`ShardError::Configuration`] for an empty suite name, suffix or
    /// engine, a zero failure exit code, or an output path that is the
    /// declaration or an existing file, and
    /// [`ShardError::InvalidOutputExtension`] for a bad output path.
    pub fn validate(&self) -> Result<(), ShardError> {
        if self.suite.trim().is_empty() {
            return Err(ShardError::Configuration("suite name must not be empty".to_string()));
        }
        if self.suffix.is_empty() {
            return Err(ShardError::Configuration("test file suffix must not be empty".to_string()));
        }
        if self.engine.trim().is_empty() {
            return Err(ShardError::Configuration("engine command must not be empty".to_string()));
        }
        if self.failure_exit_code == Some(0) {
            return Err(ShardError::Configuration(
                "failure exit code must be non-zero".to_string(),
            ));
        }
        if let Some(output) = &self.output {
            validate_output_path(output)?;
            // The run writes and later removes this file, so it must be new.
            if same_path(output, &self.declaration) {
                return Err(ShardError::Configuration(format!(
                    "output path '{}' is the suite declaration itself",
                    output.display()
                )));
            }
            if fs::symlink_metadata(output).is_ok() {
                return Err(ShardError::Configuration(format!(
                    "output path '{}' already exists; refusing to overwrite it",
                    output.display()
                )));
            }
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    let resolve = |path: &Path| {
        fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    resolve(a) == resolve(b)
}
