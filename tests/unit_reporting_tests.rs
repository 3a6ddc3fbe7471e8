//! # Reporting Unit Tests / 报告单元测试
//!
//! Tests for the HTML report of a run outcome.
//!
//! 测试运行结果的 HTML 报告。

use shard_runner::core::aggregate::aggregate;
use shard_runner::core::models::{RunOutcome, WorkerResult};
use shard_runner::reporting::generate_html_report;
use shard_runner::reporting::html::render_html_report;
use std::path::PathBuf;
use tempfile::tempdir;

fn outcome(failing: bool) -> RunOutcome {
    let results = vec![
        WorkerResult {
            shard: 0,
            output: "OK (3 tests)\n".to_string(),
            status: 0,
            file_count: 3,
        },
        WorkerResult {
            shard: 1,
            output: "FAILURES! <Tests: 2>\n".to_string(),
            status: if failing { 1 } else { 0 },
            file_count: 2,
        },
        WorkerResult {
            shard: 2,
            output: String::new(),
            status: 0,
            file_count: 0,
        },
    ];
    aggregate(results, None, PathBuf::from("/tmp/shard-runner-x-statuses.jsonl"))
}

#[cfg(test)]
mod html_tests {
    use super::*;

    #[test]
    fn test_report_lists_every_shard() {
        let page = render_html_report(&outcome(false)).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        for name in ["shard-0", "shard-1", "shard-2"] {
            assert!(page.contains(name), "missing {name}");
        }
        assert!(!page.contains("<details>"));
    }

    #[test]
    fn test_failed_shard_output_is_escaped() {
        let page = render_html_report(&outcome(true)).into_string();
        assert!(page.contains("<details>"));
        assert!(page.contains("FAILURES! &lt;Tests: 2&gt;"));
        assert!(page.contains("shard-runner-x-statuses.jsonl"));
    }

    #[test]
    fn test_report_is_written_to_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("reports/run.html");
        generate_html_report(&outcome(true), &path).unwrap();

        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("shard-1"));
    }
}
