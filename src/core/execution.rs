//! # Worker Dispatch Module / 工作进程分发模块
//!
//! Launches one worker per shard against the synthesized configuration and
//! collects what each one left behind.
//!
//! All workers are spawned before any is awaited (fan-out), then every task is
//! joined (the barrier). Each task owns its output sink and its result slot,
//! and appends exactly one line to the status record; nothing is read back
//! until every task has joined. There is no retry, no timeout and no
//! cancellation: one shard's failure never affects another shard.
//!
//! 针对合成配置为每个分片启动一个工作进程，并收集每个进程留下的结果。
//! 先派生所有工作进程再等待（扇出），然后等待所有任务结束（屏障）。

use colored::*;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::context::RunContext;
use crate::core::models::{Shard, StatusLine, WorkerResult, shard_suite_name};
use crate::infra::command::{self, EngineCommand, SPAWN_FAILURE_STATUS};
use crate::infra::{fs, t};

/// Engine flag that selects the configuration file.
pub const CONFIGURATION_FLAG: &str = "--configuration";
/// Engine flag that selects the sub-suite.
pub const SUITE_FLAG: &str = "--testsuite";
/// Engine flag that forwards the auto-prepend hook.
pub const PREPEND_FLAG: &str = "--prepend";

/// Whether workers are actually started.
/// 是否真正启动工作进程。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Execute,
    /// Print each planned invocation; every shard resolves as a trivial success.
    DryRun,
}

/// One planned worker process.
/// 一个计划中的工作进程。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInvocation {
    pub shard: usize,
    pub program: String,
    pub args: Vec<String>,
    /// Exclusive output sink for this worker.
    pub sink: PathBuf,
    pub file_count: usize,
}

impl WorkerInvocation {
    /// Shards without files are resolved without starting a process.
    pub fn is_trivial(&self) -> bool {
        self.file_count == 0
    }

    pub fn command_line(&self) -> String {
        command::render_command_line(&self.program, &self.args)
    }

    fn trivial_result(&self) -> WorkerResult {
        WorkerResult {
            shard: self.shard,
            output: String::new(),
            status: 0,
            file_count: self.file_count,
        }
    }
}

/// Builds the invocation of every shard, in shard order:
/// `<engine> [engine args] --configuration <config> --testsuite shard-<i> [--prepend <hook>]`.
///
/// 按分片顺序构建每个分片的调用命令。
pub fn plan_invocations(
    engine: &EngineCommand,
    engine_args: &[String],
    config_path: &Path,
    prepend: Option<&Path>,
    shards: &[Shard],
    context: &RunContext,
) -> Vec<WorkerInvocation> {
    shards
        .iter()
        .map(|shard| {
            let mut args = engine.args.clone();
            args.extend(engine_args.iter().cloned());
            args.push(CONFIGURATION_FLAG.to_string());
            args.push(config_path.display().to_string());
            args.push(SUITE_FLAG.to_string());
            args.push(shard.suite_name());
            if let Some(hook) = prepend {
                args.push(PREPEND_FLAG.to_string());
                args.push(hook.display().to_string());
            }

            WorkerInvocation {
                shard: shard.index,
                program: engine.program.clone(),
                args,
                sink: context.sink_path(shard.index),
                file_count: shard.files.len(),
            }
        })
        .collect()
}

/// Runs every invocation concurrently and waits for all of them.
///
/// Results come back in invocation order; a task that panicked is reported
/// as a failed shard rather than aborting the run.
///
/// 并发运行所有调用并等待全部完成。
pub async fn dispatch(
    invocations: Vec<WorkerInvocation>,
    working_dir: &Path,
    status_record: &Path,
    mode: DispatchMode,
) -> Vec<WorkerResult> {
    if mode == DispatchMode::DryRun {
        return invocations
            .iter()
            .map(|invocation| {
                println!(
                    "{}",
                    t!(
                        "dispatch.dry_run",
                        shard = shard_suite_name(invocation.shard),
                        files = invocation.file_count,
                        command = invocation.command_line()
                    )
                    .cyan()
                );
                invocation.trivial_result()
            })
            .collect();
    }

    let mut slots = Vec::with_capacity(invocations.len());
    let mut handles = Vec::with_capacity(invocations.len());
    for invocation in invocations {
        slots.push((invocation.shard, invocation.file_count));
        handles.push(tokio::spawn(run_worker(
            invocation,
            working_dir.to_path_buf(),
            status_record.to_path_buf(),
        )));
    }
    tracing::debug!(workers = handles.len(), "all workers launched");

    join_all(handles)
        .await
        .into_iter()
        .zip(slots)
        .map(|(joined, (shard, file_count))| match joined {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(shard, error = %err, "worker task did not complete");
                WorkerResult {
                    shard,
                    output: format!("worker task for {} did not complete: {err}\n", shard_suite_name(shard)),
                    status: SPAWN_FAILURE_STATUS,
                    file_count,
                }
            }
        })
        .collect()
}

async fn run_worker(invocation: WorkerInvocation, working_dir: PathBuf, status_record: PathBuf) -> WorkerResult {
    let name = shard_suite_name(invocation.shard);

    let result = if invocation.is_trivial() {
        println!("{}", t!("dispatch.shard_empty", shard = &name).dimmed());
        invocation.trivial_result()
    } else {
        execute_worker(&invocation, &working_dir).await
    };

    record_status(&status_record, &result).await;
    result
}

async fn execute_worker(invocation: &WorkerInvocation, working_dir: &Path) -> WorkerResult {
    let name = shard_suite_name(invocation.shard);
    tracing::debug!(shard = invocation.shard, command = %invocation.command_line(), "spawning worker");

    let started = Instant::now();
    let run = command::run_to_sink(&invocation.program, &invocation.args, working_dir, &invocation.sink).await;
    let elapsed = started.elapsed().as_secs_f64();

    let (status, spawn_error) = match run {
        Ok(status) => (command::exit_code_of(status), None),
        Err(err) => {
            tracing::error!(shard = invocation.shard, error = %err, "worker could not be started");
            (SPAWN_FAILURE_STATUS, Some(err))
        }
    };

    let mut output = match fs::read_sink(&invocation.sink).await {
        Ok(output) => output,
        Err(err) => format!("failed to read output of {name}: {err}\n"),
    };
    if let Some(err) = spawn_error {
        output.push_str(&format!("failed to start '{}': {err}\n", invocation.program));
    }

    let duration = format!("{elapsed:.2}");
    if status == 0 {
        println!(
            "{}",
            t!("dispatch.shard_passed", shard = &name, files = invocation.file_count, duration = &duration).green()
        );
    } else {
        println!(
            "{}",
            t!("dispatch.shard_failed", shard = &name, status = status, duration = &duration).red()
        );
    }

    WorkerResult {
        shard: invocation.shard,
        output,
        status,
        file_count: invocation.file_count,
    }
}

async fn record_status(status_record: &Path, result: &WorkerResult) {
    let line = StatusLine {
        shard: result.shard,
        status: result.status,
    };
    let encoded = match serde_json::to_string(&line) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::warn!(shard = result.shard, error = %err, "failed to encode status line");
            return;
        }
    };
    if let Err(err) = fs::append_line(status_record, &encoded).await {
        tracing::warn!(
            path = %status_record.display(),
            error = %err,
            "failed to append to status record"
        );
    }
}
