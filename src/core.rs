//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Shard Runner: reading a
//! suite declaration, discovering test files, partitioning them into shards,
//! synthesizing the shard configuration, dispatching workers and aggregating
//! their results.
//!
//! 此模块包含 Shard Runner 的核心功能：读取套件声明、发现测试文件、
//! 将其划分为分片、合成分片配置、分发工作进程并聚合结果。

pub mod aggregate;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod execution;
pub mod models;
pub mod pipeline;
pub mod planner;
pub mod suite;
pub mod synthesis;

// Re-exports
pub use context::{RunContext, Teardown};
pub use error::ShardError;
pub use models::{RunOutcome, Shard, TestFile, WorkerResult};
pub use pipeline::run_sharded_suite;
