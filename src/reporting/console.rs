//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the combined worker output and a per-shard summary
//! table to the console, with colors and internationalized labels.
//!
//! 此模块在控制台打印合并后的工作进程输出和每个分片的摘要表格，
//! 带有颜色和国际化标签。

use colored::*;

use crate::core::models::{RunOutcome, WorkerResult, shard_suite_name};
use crate::infra::t;

/// Prints the shard outputs, already concatenated in shard order.
pub fn print_combined_output(outcome: &RunOutcome) {
    if outcome.output.trim().is_empty() {
        return;
    }
    println!("\n{}", t!("report.output_banner").bold());
    print!("{}", outcome.output);
}

/// Prints a formatted summary of shard results to the console.
///
/// 在控制台打印格式化的分片结果摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Shard Summary ---
///   - Passed   | shard-0    |     3 files | exit 0
///   - Failed   | shard-1    |     2 files | exit 1
///   - Empty    | shard-2    |     0 files | exit 0
/// ```
pub fn print_summary(outcome: &RunOutcome) {
    println!("\n{}", t!("report.summary_banner").bold());

    for result in &outcome.results {
        println!(
            "  - {:<10} | {:<10} | {:>5} {} | exit {}",
            status_label(result),
            shard_suite_name(result.shard),
            result.file_count,
            t!("report.files"),
            result.status
        );
    }

    if outcome.is_success() {
        println!("\n{}", t!("report.all_passed").green().bold());
    } else {
        let failed = outcome
            .failed_shards()
            .into_iter()
            .map(shard_suite_name)
            .collect::<Vec<_>>()
            .join(", ");
        println!("\n{}", t!("report.failed_shards", shards = failed).red().bold());
        println!(
            "{}",
            t!("report.status_record", path = outcome.status_record.display()).yellow()
        );
    }
}

fn status_label(result: &WorkerResult) -> ColoredString {
    if !result.passed() {
        t!("report.status_failed").red()
    } else if result.file_count == 0 {
        t!("report.status_empty").dimmed()
    } else {
        t!("report.status_passed").green()
    }
}
