//! # Result Aggregation Module / 结果聚合模块
//!
//! Folds the per-shard worker results into one [`RunOutcome`].
//!
//! 将每个分片的工作进程结果合并为一个 [`RunOutcome`]。

use std::io;
use std::path::{Path, PathBuf};

use crate::core::models::{RunOutcome, StatusLine, WorkerResult};

/// Exit code reported when at least one shard fails and no override is set.
/// 至少一个分片失败且未设置覆盖值时报告的退出码。
pub const DEFAULT_FAILURE_EXIT_CODE: u8 = 3;

/// Reduces per-shard statuses: `0` iff every status is `0`, otherwise the
/// override or [`DEFAULT_FAILURE_EXIT_CODE`].
pub fn reduce_statuses<I>(statuses: I, failure_exit_code: Option<u8>) -> u8
where
    I: IntoIterator<Item = i32>,
{
    if statuses.into_iter().all(|status| status == 0) {
        0
    } else {
        failure_exit_code.unwrap_or(DEFAULT_FAILURE_EXIT_CODE)
    }
}

/// Builds the run outcome.
///
/// Outputs are concatenated strictly in ascending shard index, whatever order
/// the workers finished in. A non-empty output that lacks a trailing newline
/// gets one, so two shards never share a line.
///
/// 构建运行结果。输出严格按照分片索引升序拼接，与工作进程的完成顺序无关。
pub fn aggregate(
    mut results: Vec<WorkerResult>,
    failure_exit_code: Option<u8>,
    status_record: PathBuf,
) -> RunOutcome {
    results.sort_by_key(|result| result.shard);

    let mut output = String::with_capacity(results.iter().map(|result| result.output.len() + 1).sum());
    for result in &results {
        output.push_str(&result.output);
        if !result.output.is_empty() && !result.output.ends_with('\n') {
            output.push('\n');
        }
    }

    let exit_code = reduce_statuses(results.iter().map(|result| result.status), failure_exit_code);

    RunOutcome {
        exit_code,
        output,
        results,
        status_record,
    }
}

/// Reads a status record back, sorted by shard index.
///
/// Unparseable lines are skipped.
///
/// # Errors
/// Returns the I/O error if the record cannot be read.
pub fn read_status_record(path: &Path) -> io::Result<Vec<StatusLine>> {
    let content = std::fs::read_to_string(path)?;
    let mut lines: Vec<StatusLine> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    lines.sort_by_key(|line| line.shard);
    Ok(lines)
}
