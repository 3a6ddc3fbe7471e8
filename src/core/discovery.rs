//! # Test File Discovery Module / 测试文件发现模块
//!
//! Expands suite directories into the concrete test files they contain.
//!
//! 将套件目录展开为其中包含的具体测试文件。

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::ShardError;
use crate::core::models::{SuiteDirectory, TestFile};

/// Collects every regular file under `dir` whose name ends with `suffix`.
///
/// Entries are visited in lexicographic order, so discovery over an unchanged
/// tree always yields the same sequence. Symlinked directories below `dir`
/// are not followed. A directory that does not exist yields no files.
///
/// 收集 `dir` 下所有文件名以 `suffix` 结尾的普通文件。
/// 条目按字典序访问，因此对未变化的目录树进行发现总是产生相同的序列。
/// 不跟随符号链接目录。不存在的目录不产生任何文件。
///
/// # Errors
/// Returns [`ShardError::Io`] if an existing directory cannot be read.
pub fn discover(dir: &Path, suffix: &str) -> Result<Vec<TestFile>, ShardError> {
    let mut files = Vec::new();
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => walk(dir, suffix, &mut files)?,
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(ShardError::io(
                format!("failed to inspect test directory '{}'", dir.display()),
                err,
            ));
        }
    }
    Ok(files)
}

fn walk(dir: &Path, suffix: &str, files: &mut Vec<TestFile>) -> Result<(), ShardError> {
    let read_failed = |err| ShardError::io(format!("failed to read directory '{}'", dir.display()), err);

    let mut entries = fs::read_dir(dir)
        .map_err(read_failed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_failed)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(read_failed)?;

        if file_type.is_dir() {
            walk(&path, suffix, files)?;
        } else if matches_suffix(&path, suffix) && is_regular_file(&path, file_type) {
            files.push(TestFile::new(path, suffix));
        }
    }
    Ok(())
}

fn matches_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
}

fn is_regular_file(path: &Path, file_type: fs::FileType) -> bool {
    if file_type.is_symlink() {
        // Links count only when they resolve to a regular file.
        fs::metadata(path).is_ok_and(|meta| meta.is_file())
    } else {
        file_type.is_file()
    }
}

/// Discovers the files of every directory of a suite, in declaration order.
///
/// Directory paths are resolved against `base` (the declaration's own
/// directory). A directory's `suffix` attribute wins over `default_suffix`.
/// A file reachable through more than one directory is kept only at its
/// first position.
///
/// 按声明顺序发现套件中每个目录的文件。
/// 目录路径相对于 `base`（声明文件所在目录）解析。
///
/// # Errors
/// Returns [`ShardError::Io`] if a directory cannot be read or `base` cannot
/// be made absolute.
pub fn discover_suite(
    directories: &[SuiteDirectory],
    base: &Path,
    default_suffix: &str,
) -> Result<Vec<TestFile>, ShardError> {
    let base = std::path::absolute(base).map_err(|err| {
        ShardError::io(format!("failed to resolve '{}'", base.display()), err)
    })?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    for directory in directories {
        let suffix = directory.suffix.as_deref().unwrap_or(default_suffix);
        let root = base.join(&directory.path);
        let found = discover(&root, suffix)?;
        tracing::debug!(
            directory = %root.display(),
            suffix,
            count = found.len(),
            "discovered test files"
        );
        files.extend(found.into_iter().filter(|file| {
            let key = fs::canonicalize(&file.path).unwrap_or_else(|_| file.path.clone());
            seen.insert(key)
        }));
    }

    Ok(files)
}
