//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures that flow through a run:
//! suite declarations, discovered test files, shards, worker results and the
//! final outcome.
//!
//! 此模块定义了贯穿整个运行过程的核心数据结构：
//! 套件声明、发现的测试文件、分片、工作进程结果以及最终结果。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Prefix of every synthesized sub-suite name.
/// 每个合成子套件名称的前缀。
pub const SHARD_SUITE_PREFIX: &str = "shard-";

/// The root element of a suite declaration, kept so a synthesized document
/// carries the same engine-level settings (bootstrap, colors, ...).
///
/// 套件声明的根元素，保留下来以便合成文档携带相同的引擎级设置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRoot {
    /// Element name, e.g. `phpunit`.
    pub element: String,
    /// Attributes in document order, already unescaped.
    pub attributes: Vec<(String, String)>,
}

impl Default for DeclarationRoot {
    fn default() -> Self {
        Self {
            element: "phpunit".to_string(),
            attributes: Vec::new(),
        }
    }
}

/// A `<directory>` entry registered under a suite.
/// 套件下注册的 `<directory>` 条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteDirectory {
    /// The directory path exactly as declared.
    pub path: String,
    /// Per-directory suffix override.
    pub suffix: Option<String>,
}

/// One entry of a declared suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteEntry {
    Directory(SuiteDirectory),
    File(TestFile),
}

/// A named suite and its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSuite {
    pub name: String,
    pub entries: Vec<SuiteEntry>,
}

/// An ordered mapping from suite name to entries, plus the root element.
///
/// The parser yields the directory entries of one suite; the synthesizer
/// builds a full declaration out of file entries.
///
/// 从套件名称到条目的有序映射，以及根元素。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuiteDeclaration {
    pub root: DeclarationRoot,
    pub suites: Vec<DeclaredSuite>,
}

/// The result of looking one suite up in a declaration document.
/// 在声明文档中查找单个套件的结果。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuiteLookup {
    pub root: DeclarationRoot,
    /// Empty when the suite is absent.
    pub directories: Vec<SuiteDirectory>,
    /// Every suite name seen in the document, in order.
    pub suites: Vec<String>,
}

/// A discovered test file, tagged with the suffix it matched.
/// 已发现的测试文件，并标记其匹配的后缀。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestFile {
    pub path: PathBuf,
    pub suffix: String,
}

impl TestFile {
    pub fn new(path: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            suffix: suffix.into(),
        }
    }
}

/// One contiguous slice of the discovered file set, executed by one worker.
/// 已发现文件集合中的一个连续切片，由一个工作进程执行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Index in `[0, N)`.
    pub index: usize,
    /// Files in discovery order. May be empty when there are more workers than files.
    pub files: Vec<TestFile>,
}

impl Shard {
    /// The sub-suite name this shard is registered under, e.g. `shard-3`.
    pub fn suite_name(&self) -> String {
        shard_suite_name(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Builds the sub-suite name for a shard index.
pub fn shard_suite_name(index: usize) -> String {
    format!("{SHARD_SUITE_PREFIX}{index}")
}

/// What a single worker left behind once it terminated.
///
/// 单个工作进程终止后留下的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResult {
    /// The shard the worker ran.
    pub shard: usize,
    /// Captured stdout and stderr of the worker.
    pub output: String,
    /// Numeric exit status. `0` means the shard passed.
    pub status: i32,
    /// Number of files the shard held.
    pub file_count: usize,
}

impl WorkerResult {
    pub fn passed(&self) -> bool {
        self.status == 0
    }
}

impl fmt::Display for WorkerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exited with {}", shard_suite_name(self.shard), self.status)
    }
}

/// One line of the run's status record.
/// 运行状态记录中的一行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub shard: usize,
    pub status: i32,
}

/// The single artifact a run hands back to its caller.
///
/// 运行交还给调用者的唯一产物。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// `0` iff every shard passed.
    pub exit_code: u8,
    /// Worker outputs concatenated in ascending shard order.
    pub output: String,
    /// Per-shard results in ascending shard order.
    pub results: Vec<WorkerResult>,
    /// Where the full list of per-shard statuses can be inspected.
    pub status_record: PathBuf,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Indices of the shards that exited non-zero.
    pub fn failed_shards(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|result| !result.passed())
            .map(|result| result.shard)
            .collect()
    }
}
