//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Shard Runner,
//! including process spawning, artifact file operations, and i18n support.
//!
//! 此模块为 Shard Runner 提供基础设施服务，
//! 包括进程派生、产物文件操作和国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
