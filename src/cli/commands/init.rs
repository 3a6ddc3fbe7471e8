//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command for the Shard Runner CLI,
//! which creates a new `ShardRunner.toml` configuration file.
//!
//! 此模块实现了 Shard Runner CLI 的 `init` 命令，
//! 用于创建新的 `ShardRunner.toml` 配置文件。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::Path};

use crate::infra::t;

/// Default configuration written by `init`.
pub const DEFAULT_CONFIG: &str = r#"# Shard Runner Configuration / Shard Runner 配置
# Every key is optional; command-line flags take precedence.
# 所有键都是可选的；命令行参数优先。

# Language for console messages / 控制台消息的语言
language = "en"

# Engine command each worker runs / 每个工作进程运行的引擎命令
engine = "vendor/bin/phpunit"

# Extra engine arguments, placed before the shard selection
# 额外的引擎参数，位于分片选择参数之前
engine_args = ["--colors=never"]

# Test file name suffix / 测试文件名后缀
suffix = "Test.php"

# Number of shards; defaults to available parallelism x 3
# 分片数量；默认为可用并行度 x 3
# workers = 8

# Exit code when at least one shard fails (default 3)
# 至少一个分片失败时的退出码（默认 3）
# failure_exit_code = 1

# Where run artifacts are written; defaults to the system temp directory
# 运行产物的写入位置；默认为系统临时目录
# scratch_dir = "/tmp"
"#;

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
///
/// # Errors
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn execute(output: &Path, force: bool) -> Result<()> {
    // Check if file already exists
    if output.exists() && !force {
        println!("{}", t!("init.file_exists", path = output.display()).red());
        println!("{}", t!("init.use_force").yellow());
        return Ok(());
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init.create_parent_dir_failed", path = parent.display()).to_string()
            })?;
        }
    }

    fs::write(output, DEFAULT_CONFIG)
        .with_context(|| t!("init.write_failed", path = output.display()).to_string())?;

    println!("{}", t!("init.success", path = output.display()).green());
    println!("{}", t!("init.next_steps"));

    Ok(())
}
