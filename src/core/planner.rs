//! # Shard Planner Module / 分片计划模块
//!
//! Divides the ordered file set into a fixed number of contiguous shards.
//!
//! Shard size is `max(1, ceil(total / workers))`, and shard `i` takes the
//! files at offsets `[i * size, (i + 1) * size)`. Exactly `workers` shards are
//! always produced; when there are more workers than files the trailing shards
//! are empty. Balancing is by file count, not by file cost.
//!
//! 将有序的文件集合划分为固定数量的连续分片。
//! 分片大小为 `max(1, ceil(total / workers))`，第 `i` 个分片获取偏移量
//! `[i * size, (i + 1) * size)` 处的文件。始终生成恰好 `workers` 个分片；
//! 当工作进程多于文件时，末尾的分片为空。

use std::num::NonZeroUsize;

use crate::core::models::{Shard, TestFile};

/// Represents the static allocation of files to shards for one run.
/// 表示一次运行中文件到分片的静态分配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    /// Exactly one entry per worker, in index order.
    /// 每个工作进程恰好一个条目，按索引排序。
    pub shards: Vec<Shard>,
    /// Files per shard; the last non-empty shard may hold fewer.
    /// 每个分片的文件数；最后一个非空分片可能更少。
    pub shard_size: usize,
    /// Total number of files across all shards.
    /// 所有分片的文件总数。
    pub total_files: usize,
}

impl ShardPlan {
    /// Number of shards that actually hold files.
    pub fn non_empty_shards(&self) -> usize {
        self.shards.iter().filter(|shard| !shard.is_empty()).count()
    }
}

/// Computes the shard size for `total` files spread over `workers`.
pub fn shard_size(total: usize, workers: NonZeroUsize) -> usize {
    total.div_ceil(workers.get()).max(1)
}

/// Partitions `files` into exactly `workers` contiguous shards.
///
/// Order is preserved: reading the shards in index order, then each shard's
/// files in order, reproduces `files` exactly.
///
/// 将 `files` 划分为恰好 `workers` 个连续分片，并保持顺序。
pub fn partition(files: Vec<TestFile>, workers: NonZeroUsize) -> ShardPlan {
    let total_files = files.len();
    let size = shard_size(total_files, workers);

    let mut remaining = files.into_iter();
    let shards = (0..workers.get())
        .map(|index| Shard {
            index,
            files: remaining.by_ref().take(size).collect(),
        })
        .collect();

    ShardPlan {
        shards,
        shard_size: size,
        total_files,
    }
}
