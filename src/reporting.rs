//! # Reporting Module / 报告模块
//!
//! This module handles the display of a run outcome in multiple formats.
//! It prints the combined shard output and a colorful summary table to the
//! console and can render the same summary as an HTML page.
//!
//! 此模块以多种格式展示运行结果。
//! 它在控制台打印合并后的分片输出和彩色摘要表格，并可将相同的摘要渲染为 HTML 页面。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_combined_output, print_summary};
pub use html::generate_html_report;
