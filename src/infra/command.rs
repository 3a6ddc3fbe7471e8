//! # Command Module / 命令模块
//!
//! Turns the configured engine command into an argv and runs worker processes
//! with their output redirected into a sink file.
//!
//! 将配置的引擎命令转换为参数列表，并运行输出重定向到文件的工作进程。

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use crate::core::error::ShardError;

/// Status recorded for a worker that could not be started at all.
/// 无法启动的工作进程所记录的状态。
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// The engine command line, split into a program and its leading arguments.
/// 引擎命令行，拆分为程序及其前置参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    /// Expands `~` and environment variables, then splits with shell quoting rules.
    ///
    /// # Errors
    /// Returns [`ShardError::Configuration`] if the command cannot be expanded,
    /// has unbalanced quotes, or is empty.
    pub fn parse(command: &str) -> Result<Self, ShardError> {
        let expanded = shellexpand::full(command)
            .map_err(|err| {
                ShardError::Configuration(format!("failed to expand engine command '{command}': {err}"))
            })?
            .to_string();

        let mut parts = shlex::split(&expanded).ok_or_else(|| {
            ShardError::Configuration(format!("failed to parse engine command: {expanded}"))
        })?;

        if parts.is_empty() {
            return Err(ShardError::Configuration("engine command is empty".to_string()));
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }
}

/// Renders an argv as a copy-pasteable shell command.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let words = std::iter::once(program).chain(args.iter().map(String::as_str));
    shlex::try_join(words.clone()).unwrap_or_else(|_| words.collect::<Vec<_>>().join(" "))
}

/// Spawns `program` and waits for it, sending stdout and stderr to `sink`.
///
/// The sink is truncated first and belongs to this process alone.
///
/// 派生 `program` 并等待其结束，将 stdout 和 stderr 写入 `sink`。
///
/// # Errors
/// Returns the I/O error if the sink cannot be created or the process cannot
/// be spawned or waited on.
pub async fn run_to_sink(
    program: &str,
    args: &[String],
    working_dir: &Path,
    sink: &Path,
) -> io::Result<ExitStatus> {
    let stdout = std::fs::File::create(sink)?;
    let stderr = stdout.try_clone()?;

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    child.wait().await
}

/// Reduces an exit status to a number. A signal-terminated process maps to
/// `128 + signal`, as shells report it.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
