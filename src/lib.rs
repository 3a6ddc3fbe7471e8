//! # Shard Runner Library / Shard Runner 库
//!
//! This library provides the core functionality for the Shard Runner tool,
//! which splits a declared test suite into balanced shards and runs every
//! shard as its own worker process.
//!
//! 此库为 Shard Runner 工具提供核心功能，
//! 它将声明的测试套件拆分为均衡的分片，并将每个分片作为独立的工作进程运行。
//!
//! ## Modules / 模块
//!
//! - `core` - Suite parsing, discovery, partitioning, synthesis, dispatch and aggregation
//! - `infra` - Infrastructure services like process spawning and run artifacts
//! - `reporting` - Console and HTML summaries of a run
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 套件解析、发现、分区、合成、分发与聚合
//! - `infra` - 基础设施服务，如进程派生和运行产物
//! - `reporting` - 运行结果的控制台与 HTML 摘要
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::{config, error, models};

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en"), and finally falls back to "en".
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    set_language(&locale);
}

/// Sets the UI language, falling back the same way as [`init`].
pub fn set_language(locale: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
