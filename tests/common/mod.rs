// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Creates an empty PHP test file at `relative` under `root`, with parents.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    fs::write(&path, "<?php\n").expect("Failed to write test file");
    path
}

/// Builds a phpunit-style declaration with one `<directory>` per listed path.
///
/// 构建 phpunit 风格的声明，每个列出的路径对应一个 `<directory>`。
pub fn declaration(suites: &[(&str, &[&str])]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <phpunit bootstrap=\"vendor/autoload.php\" colors=\"true\">\n    <testsuites>\n",
    );
    for (name, directories) in suites {
        xml.push_str(&format!("        <testsuite name=\"{name}\">\n"));
        for dir in *directories {
            xml.push_str(&format!("            <directory>{dir}</directory>\n"));
        }
        xml.push_str("        </testsuite>\n");
    }
    xml.push_str("    </testsuites>\n</phpunit>\n");
    xml
}

/// Writes `content` as `phpunit.xml` under `root`.
pub fn write_declaration(root: &Path, content: &str) -> PathBuf {
    let path = root.join("phpunit.xml");
    fs::write(&path, content).expect("Failed to write declaration");
    path
}

/// A project with a `unit` suite over `tests/Unit` holding five test files,
/// one of which fails under the fake engine when `failing` is set.
///
/// 一个包含 `unit` 套件的项目，`tests/Unit` 下有五个测试文件。
pub fn sample_project(failing: bool) -> TempDir {
    let project = tempdir().expect("Failed to create temporary directory");
    let root = project.path();
    touch(root, "tests/Unit/ATest.php");
    touch(root, "tests/Unit/BTest.php");
    touch(root, "tests/Unit/CTest.php");
    touch(root, "tests/Unit/Sub/DTest.php");
    if failing {
        touch(root, "tests/Unit/EFailingTest.php");
    } else {
        touch(root, "tests/Unit/ETest.php");
    }
    touch(root, "tests/Unit/helpers.php");
    write_declaration(root, &declaration(&[("unit", &["tests/Unit"]), ("feature", &["tests/Feature"])]));
    project
}

/// Script standing in for the test engine. It prints its sub-suite name and
/// the base name of every file the synthesized configuration assigns to it,
/// and exits 1 if any of those names contains `Failing`. Lower shards sleep
/// longer, so workers finish in reverse shard order.
const FAKE_ENGINE: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    --configuration) config="$2"; shift 2 ;;
    --testsuite) suite="$2"; shift 2 ;;
    *) shift ;;
  esac
done
case "$suite" in
  shard-0) sleep 0.6 ;;
  shard-1) sleep 0.3 ;;
esac
echo "$suite"
status=0
for file in $(sed -n "/<testsuite name=\"$suite\">/,/<\/testsuite>/p" "$config" | grep '<file' | sed -e 's/.*">//' -e 's/<\/file>.*//'); do
  name=$(basename "$file")
  echo "$name"
  case "$name" in
    *Failing*) status=1 ;;
  esac
done
exit $status
"#;

/// Installs the fake engine as an executable script under `root`.
#[cfg(unix)]
pub fn fake_engine(root: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = root.join("fake-engine.sh");
    fs::write(&path, FAKE_ENGINE).expect("Failed to write fake engine");
    let mut permissions = fs::metadata(&path).expect("Failed to stat fake engine").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("Failed to mark fake engine executable");
    path
}

/// Names of the entries left in `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(read) => read
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
