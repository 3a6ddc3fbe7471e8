//! # Error Module / 错误模块
//!
//! Every fatal condition a run can hit before or around dispatch.
//! A failing shard is not an error: it surfaces as a non-zero status in the
//! aggregated outcome.
//!
//! 运行在分发之前或分发期间可能遇到的所有致命错误。
//! 分片失败不是错误：它以非零状态体现在聚合结果中。

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for configuration and usage errors.
/// 配置和用法错误的退出码。
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Exit code for unexpected I/O or rendering failures.
/// 意外 I/O 或渲染故障的退出码。
pub const EXIT_INTERNAL_ERROR: u8 = 1;

/// Errors raised while preparing or running a sharded suite.
/// 准备或运行分片套件时产生的错误。
#[derive(Debug, Error)]
pub enum ShardError {
    /// Invalid settings, e.g. a zero worker count or an empty suffix.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The synthesized configuration path does not end in the declaration extension.
    #[error("output path '{}' must end in '.{expected}'", path.display())]
    InvalidOutputExtension { path: PathBuf, expected: &'static str },

    /// The suite declaration could not be interpreted unambiguously.
    #[error("malformed suite declaration '{}': {reason}", path.display())]
    MalformedDeclaration { path: PathBuf, reason: String },

    /// The named suite is absent or registers no directories.
    #[error("suite '{suite}' was not found or declares no directories")]
    SuiteNotFound { suite: String },

    /// The suite resolved, but no file under its directories matched the suffix.
    #[error("suite '{suite}' contains no files ending in '{suffix}'")]
    NoTestsDiscovered { suite: String, suffix: String },

    /// A filesystem operation failed.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The synthesized declaration could not be rendered.
    #[error("failed to render suite declaration: {0}")]
    Render(String),
}

impl ShardError {
    /// Wraps an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Maps the error to the process exit code the CLI reports.
    /// 将错误映射为 CLI 报告的进程退出码。
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_)
            | Self::InvalidOutputExtension { .. }
            | Self::MalformedDeclaration { .. }
            | Self::SuiteNotFound { .. }
            | Self::NoTestsDiscovered { .. } => EXIT_USAGE_ERROR,
            Self::Io { .. } | Self::Render(_) => EXIT_INTERNAL_ERROR,
        }
    }
}
