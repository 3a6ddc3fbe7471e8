//! # Shard Configuration Synthesis Module / 分片配置合成模块
//!
//! Builds the suite declaration the engine is pointed at: one `shard-<i>`
//! sub-suite per shard, each listing its files as leaf entries.
//!
//! 构建引擎所使用的套件声明：每个分片一个 `shard-<i>` 子套件，
//! 每个子套件将其文件列为叶子条目。

use std::path::Path;

use crate::core::error::ShardError;
use crate::core::models::{DeclarationRoot, DeclaredSuite, Shard, SuiteDeclaration, SuiteEntry};
use crate::core::suite::{DECLARATION_EXTENSION, render_declaration};
use crate::infra::fs::write_atomically;

/// Checks that the synthesized configuration path carries the declaration
/// extension. Runs before any discovery work so a bad path fails fast.
///
/// 检查合成配置路径是否带有声明扩展名。在任何发现工作之前运行，以便快速失败。
///
/// # Errors
/// Returns [`ShardError::InvalidOutputExtension`] on a mismatch.
pub fn validate_output_path(path: &Path) -> Result<(), ShardError> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == DECLARATION_EXTENSION);
    if matches {
        Ok(())
    } else {
        Err(ShardError::InvalidOutputExtension {
            path: path.to_path_buf(),
            expected: DECLARATION_EXTENSION,
        })
    }
}

/// Root attributes whose values are paths the engine resolves against the
/// directory of the configuration file.
pub const PATH_ATTRIBUTES: &[&str] = &[
    "bootstrap",
    "cacheDirectory",
    "cacheResultFile",
    "coverageCacheDirectory",
    "extensionsDirectory",
    "printerFile",
    "testSuiteLoaderFile",
];

/// Copies `root`, rewriting relative path attributes to absolute paths under
/// `base` (the declaration's own directory). The synthesized configuration
/// lives elsewhere, so relative paths would otherwise resolve against the
/// wrong directory.
///
/// 复制 `root`，并将相对路径属性改写为 `base`（声明文件所在目录）下的绝对路径。
pub fn rebase_root(root: &DeclarationRoot, base: &Path) -> DeclarationRoot {
    let attributes = root
        .attributes
        .iter()
        .map(|(key, value)| {
            let is_path = PATH_ATTRIBUTES.contains(&key.as_str());
            if is_path && !value.is_empty() && Path::new(value).is_relative() {
                (key.clone(), base.join(value).display().to_string())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect();

    DeclarationRoot {
        element: root.element.clone(),
        attributes,
    }
}

/// Builds a declaration with exactly one sub-suite per shard, in shard order.
///
/// Empty shards still get a (childless) sub-suite so every index the
/// dispatcher refers to exists in the document.
///
/// 构建一个声明，每个分片恰好对应一个子套件，按分片顺序排列。
pub fn synthesize(root: &DeclarationRoot, shards: &[Shard]) -> SuiteDeclaration {
    let suites = shards
        .iter()
        .map(|shard| DeclaredSuite {
            name: shard.suite_name(),
            entries: shard.files.iter().cloned().map(SuiteEntry::File).collect(),
        })
        .collect();

    SuiteDeclaration {
        root: root.clone(),
        suites,
    }
}

/// Renders `declaration` and persists it at `path`.
///
/// # Errors
/// Returns [`ShardError::Render`] or [`ShardError::Io`].
pub fn write_config(declaration: &SuiteDeclaration, path: &Path) -> Result<(), ShardError> {
    let document = render_declaration(declaration)?;
    write_atomically(path, &document)?;
    tracing::debug!(
        path = %path.display(),
        suites = declaration.suites.len(),
        "wrote synthesized configuration"
    );
    Ok(())
}
