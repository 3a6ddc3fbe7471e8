//! # Commands / 命令
//!
//! - `run` - Shard a suite and run every shard in parallel
//! - `init` - Write a default configuration file
//!
//! - `run` - 对套件进行分片并并行运行每个分片
//! - `init` - 写入默认配置文件

pub mod init;
pub mod run;
