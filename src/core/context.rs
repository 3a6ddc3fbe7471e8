//! # Run Context Module / 运行上下文模块
//!
//! Everything that is scoped to one invocation: the random run token, the
//! scratch directory and the names of the artifacts derived from them, plus
//! the teardown guard that removes those artifacts again.
//!
//! 所有作用于单次调用的内容：随机运行令牌、临时目录以及由它们派生的产物名称，
//! 以及再次删除这些产物的清理守卫。

use rand::{Rng, distributions::Alphanumeric};
use std::path::{Path, PathBuf};

use crate::core::suite::DECLARATION_EXTENSION;
use crate::infra::fs::remove_artifact;

/// Prefix shared by every artifact a run leaves in the scratch directory.
/// 运行在临时目录中留下的所有产物共享的前缀。
pub const ARTIFACT_PREFIX: &str = "shard-runner";

const TOKEN_LEN: usize = 10;

/// Run-scoped state threaded explicitly into every component that names an
/// artifact. The token is generated once per run, so concurrent invocations
/// sharing a scratch directory never collide.
///
/// 显式传入每个需要命名产物的组件的运行级状态。
/// 令牌每次运行只生成一次，因此共享临时目录的并发调用永远不会冲突。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    token: String,
    scratch_dir: PathBuf,
}

impl RunContext {
    /// Creates a context with a fresh random token.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self::with_token(scratch_dir, generate_token())
    }

    /// Creates a context with a caller-chosen token.
    pub fn with_token(scratch_dir: impl Into<PathBuf>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// The exclusive output sink of one shard's worker.
    /// 单个分片工作进程的专属输出文件。
    pub fn sink_path(&self, shard: usize) -> PathBuf {
        self.artifact(&format!("shard-{shard}.out"))
    }

    /// The append-only record every worker writes its exit status to.
    /// 每个工作进程追加写入其退出状态的记录文件。
    pub fn status_record_path(&self) -> PathBuf {
        self.artifact("statuses.jsonl")
    }

    /// Where the synthesized configuration goes when no output path is given.
    /// 未指定输出路径时合成配置的存放位置。
    pub fn default_config_path(&self) -> PathBuf {
        self.scratch_dir
            .join(format!("{ARTIFACT_PREFIX}-{}.{DECLARATION_EXTENSION}", self.token))
    }

    fn artifact(&self, name: &str) -> PathBuf {
        self.scratch_dir
            .join(format!("{ARTIFACT_PREFIX}-{}-{name}", self.token))
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

/// Removes a run's temporary artifacts when dropped.
///
/// Created before the first artifact exists, so cleanup happens on success,
/// on shard failure and on fatal errors alike. The status record survives
/// when [`Teardown::preserve_status_record`] was called, which a failed run
/// does for post-mortem inspection.
///
/// 在被丢弃时删除运行的临时产物。
/// 它在第一个产物存在之前创建，因此无论成功、分片失败还是致命错误都会执行清理。
#[derive(Debug)]
pub struct Teardown {
    artifacts: Vec<PathBuf>,
    status_record: PathBuf,
    keep_status_record: bool,
}

impl Teardown {
    pub fn new(context: &RunContext) -> Self {
        Self {
            artifacts: Vec::new(),
            status_record: context.status_record_path(),
            keep_status_record: false,
        }
    }

    /// Registers a file for removal.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }

    /// Stops tracking `path`, leaving it on disk.
    pub fn release(&mut self, path: &Path) {
        self.artifacts.retain(|tracked| tracked != path);
    }

    pub fn preserve_status_record(&mut self) {
        self.keep_status_record = true;
    }

    pub fn status_record_preserved(&self) -> bool {
        self.keep_status_record
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.artifacts
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        for path in &self.artifacts {
            remove_artifact(path);
        }
        if !self.keep_status_record {
            remove_artifact(&self.status_record);
        }
    }
}
