//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file operations a run needs around its
//! artifacts: atomic writes of the synthesized configuration, appends to the
//! status record, and best-effort removal during teardown.
//!
//! 此模块提供运行过程中围绕产物所需的文件操作：
//! 原子写入合成配置、追加写入状态记录，以及在清理阶段尽力删除产物。

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::core::error::ShardError;

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so readers never observe a half-written document.
///
/// # Arguments
/// * `path` - Final location of the file
/// * `contents` - Bytes to write
///
/// # Errors
/// Returns [`ShardError::Io`] if the parent directory cannot be created or the
/// file cannot be written or moved into place.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), ShardError> {
    let failed = |err| ShardError::io(format!("failed to write '{}'", path.display()), err);

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(failed)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(failed)?;
    temp.write_all(contents).map_err(failed)?;
    temp.as_file().sync_all().map_err(failed)?;
    temp.persist(path).map_err(|err| failed(err.error))?;
    Ok(())
}

/// Appends one line to the status record.
///
/// Every worker appends exactly one short line with a single write, and the
/// record is only read once all workers have joined.
///
/// 向状态记录追加一行。每个工作进程仅用一次写入追加恰好一行短内容。
pub async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    let mut buffer = String::with_capacity(line.len() + 1);
    buffer.push_str(line);
    buffer.push('\n');
    file.write_all(buffer.as_bytes()).await?;
    file.flush().await
}

/// Reads a worker's output sink, tolerating a sink that was never created and
/// output that is not valid UTF-8.
pub async fn read_sink(path: &Path) -> io::Result<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err),
    }
}

/// Removes a run artifact. A missing file is fine; any other failure is
/// logged and otherwise ignored, since teardown must never fail the run.
///
/// 删除运行产物。文件不存在不是问题；其他失败只记录日志。
pub fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed run artifact"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to remove run artifact"),
    }
}
