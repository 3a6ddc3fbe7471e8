//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a run outcome as a standalone HTML page: summary
//! counters, a per-shard table, and the captured output of every failed shard
//! behind a collapsible section.
//!
//! 此模块将运行结果渲染为独立的 HTML 页面：汇总计数、每个分片的表格，
//! 以及每个失败分片的捕获输出（位于可折叠区域中）。

use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;

use crate::core::error::ShardError;
use crate::core::models::{RunOutcome, WorkerResult, shard_suite_name};
use crate::infra::fs::write_atomically;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem; color: #1f2328; }
h1 { font-size: 1.5rem; }
.generated { color: #656d76; font-size: 0.85rem; }
.summary-container { display: flex; gap: 1.5rem; margin: 1.5rem 0; }
.summary-item { display: flex; flex-direction: column; align-items: center; padding: 0.75rem 1.25rem; border: 1px solid #d0d7de; border-radius: 6px; }
.count { font-size: 1.5rem; font-weight: 600; }
.passed-text { color: #1a7f37; }
.failed-text { color: #cf222e; }
.empty-text { color: #656d76; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.4rem 0.75rem; border-bottom: 1px solid #d0d7de; }
.status-Passed { color: #1a7f37; font-weight: 600; }
.status-Failed { color: #cf222e; font-weight: 600; }
.status-Empty { color: #656d76; }
pre.output-content { background: #f6f8fa; padding: 0.75rem; overflow-x: auto; white-space: pre-wrap; }
"#;

/// Renders the report page for `outcome`.
///
/// 为 `outcome` 渲染报告页面。
pub fn render_html_report(outcome: &RunOutcome) -> Markup {
    let total = outcome.results.len();
    let failed = outcome.results.iter().filter(|result| !result.passed()).count();
    let empty = outcome
        .results
        .iter()
        .filter(|result| result.passed() && result.file_count == 0)
        .count();
    let passed = total - failed - empty;
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header")) }
                p.generated { (t!("html_report.generated", time = &generated)) }
                div.summary-container {
                    (summary_item(total, "", &t!("html_report.summary.total")))
                    (summary_item(passed, "passed-text", &t!("html_report.summary.passed")))
                    (summary_item(failed, "failed-text", &t!("html_report.summary.failed")))
                    (summary_item(empty, "empty-text", &t!("html_report.summary.empty")))
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.shard")) }
                            th { (t!("html_report.table.header.status")) }
                            th { (t!("html_report.table.header.files")) }
                            th { (t!("html_report.table.header.exit_code")) }
                        }
                    }
                    tbody {
                        @for result in &outcome.results {
                            (result_row(result))
                        }
                    }
                }
                @if !outcome.is_success() {
                    p { (t!("report.status_record", path = outcome.status_record.display())) }
                }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div.summary-item {
            span class={ "count " (class) } { (count) }
            span.label { (label) }
        }
    }
}

fn result_row(result: &WorkerResult) -> Markup {
    let (class, label) = if !result.passed() {
        ("status-Failed", t!("report.status_failed"))
    } else if result.file_count == 0 {
        ("status-Empty", t!("report.status_empty"))
    } else {
        ("status-Passed", t!("report.status_passed"))
    };

    html! {
        tr {
            td { (shard_suite_name(result.shard)) }
            td class=(class) { (label) }
            td { (result.file_count) }
            td { (result.status) }
        }
        @if !result.passed() {
            tr {
                td colspan="4" {
                    details {
                        summary { (t!("html_report.toggle_output")) }
                        pre.output-content { (result.output) }
                    }
                }
            }
        }
    }
}

/// Writes the report for `outcome` to `output_path`.
///
/// # Errors
/// Returns [`ShardError::Io`] if the file cannot be written.
pub fn generate_html_report(outcome: &RunOutcome, output_path: &Path) -> Result<(), ShardError> {
    let markup = render_html_report(outcome);
    write_atomically(output_path, markup.into_string().as_bytes())
}
