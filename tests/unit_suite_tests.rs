//! # Suite Declaration Unit Tests / 套件声明单元测试
//!
//! Tests for reading suite directories out of a declaration document and for
//! rendering synthesized declarations.
//!
//! 测试从声明文档中读取套件目录以及渲染合成声明。

use shard_runner::core::models::{DeclarationRoot, Shard, SuiteDirectory, TestFile};
use shard_runner::core::suite::{parse_suite, render_declaration};
use shard_runner::core::synthesis::{rebase_root, synthesize};
use shard_runner::error::ShardError;
use std::path::Path;

fn parse(document: &str, suite: &str) -> Result<shard_runner::models::SuiteLookup, ShardError> {
    parse_suite(document, suite, Path::new("phpunit.xml"))
}

fn dir(path: &str) -> SuiteDirectory {
    SuiteDirectory {
        path: path.to_string(),
        suffix: None,
    }
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<phpunit bootstrap="vendor/autoload.php" colors="true">
    <testsuites>
        <testsuite name="unit">
            <directory>tests/Unit</directory>
            <!-- <directory>tests/Legacy</directory> -->
            <directory suffix=".phpt">tests/Phpt</directory>
        </testsuite>
        <testsuite name="feature">
            <directory>tests/Feature</directory>
        </testsuite>
    </testsuites>
</phpunit>
"#;

    #[test]
    fn test_directories_in_declaration_order() {
        let lookup = parse(DOCUMENT, "unit").unwrap();
        assert_eq!(
            lookup.directories,
            vec![
                dir("tests/Unit"),
                SuiteDirectory {
                    path: "tests/Phpt".to_string(),
                    suffix: Some(".phpt".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_commented_directory_is_ignored() {
        let lookup = parse(DOCUMENT, "unit").unwrap();
        assert!(lookup.directories.iter().all(|d| d.path != "tests/Legacy"));
    }

    #[test]
    fn test_other_suites_do_not_leak() {
        let unit = parse(DOCUMENT, "unit").unwrap();
        assert!(unit.directories.iter().all(|d| d.path != "tests/Feature"));

        let feature = parse(DOCUMENT, "feature").unwrap();
        assert_eq!(feature.directories, vec![dir("tests/Feature")]);
    }

    #[test]
    fn test_root_element_is_kept() {
        let lookup = parse(DOCUMENT, "unit").unwrap();
        assert_eq!(lookup.root.element, "phpunit");
        assert_eq!(
            lookup.root.attributes,
            vec![
                ("bootstrap".to_string(), "vendor/autoload.php".to_string()),
                ("colors".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_absent_suite_yields_no_directories() {
        let lookup = parse(DOCUMENT, "integration").unwrap();
        assert!(lookup.directories.is_empty());
        assert_eq!(lookup.suites, vec!["unit".to_string(), "feature".to_string()]);
    }

    #[test]
    fn test_self_closing_suite_yields_no_directories() {
        let document = r#"<phpunit><testsuites><testsuite name="unit"/></testsuites></phpunit>"#;
        let lookup = parse(document, "unit").unwrap();
        assert!(lookup.directories.is_empty());
        assert_eq!(lookup.suites, vec!["unit".to_string()]);
    }

    #[test]
    fn test_escaped_directory_text_is_unescaped() {
        let document = r#"<phpunit><testsuites><testsuite name="unit">
            <directory>tests/R&amp;D</directory>
        </testsuite></testsuites></phpunit>"#;
        let lookup = parse(document, "unit").unwrap();
        assert_eq!(lookup.directories, vec![dir("tests/R&D")]);
    }

    #[test]
    fn test_file_entries_are_not_directories() {
        let document = r#"<phpunit><testsuites><testsuite name="unit">
            <file>tests/SingleTest.php</file>
            <directory>tests/Unit</directory>
            <exclude>tests/Unit/Slow</exclude>
        </testsuite></testsuites></phpunit>"#;
        let lookup = parse(document, "unit").unwrap();
        assert_eq!(lookup.directories, vec![dir("tests/Unit")]);
    }
}

#[cfg(test)]
mod malformed_tests {
    use super::*;

    fn assert_malformed(document: &str) {
        match parse(document, "unit") {
            Err(ShardError::MalformedDeclaration { .. }) => {}
            other => panic!("expected a malformed declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_suite_name() {
        assert_malformed(
            r#"<phpunit><testsuites>
                <testsuite name="unit"><directory>a</directory></testsuite>
                <testsuite name="unit"><directory>b</directory></testsuite>
            </testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_duplicate_directory() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit">
                <directory>tests</directory>
                <directory>tests</directory>
            </testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_empty_directory() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit">
                <directory></directory>
            </testsuite></testsuites></phpunit>"#,
        );
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit">
                <directory/>
            </testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_nested_suite() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit">
                <testsuite name="inner"><directory>tests</directory></testsuite>
            </testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_nested_directory() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit">
                <directory>tests<directory>more</directory></directory>
            </testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_suite_without_name() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite><directory>tests</directory></testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_mismatched_closing_tag() {
        assert_malformed(
            r#"<phpunit><testsuites><testsuite name="unit"><directory>tests</testsuite></testsuites></phpunit>"#,
        );
    }

    #[test]
    fn test_unclosed_suite() {
        assert_malformed(r#"<phpunit><testsuites><testsuite name="unit"><directory>tests</directory>"#);
    }

    #[test]
    fn test_error_names_the_declaration() {
        let err = parse_suite(
            r#"<phpunit><testsuites><testsuite name="unit"><directory/></testsuite></testsuites></phpunit>"#,
            "unit",
            Path::new("config/phpunit.xml"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("config/phpunit.xml"));
        assert_eq!(err.exit_code(), shard_runner::error::EXIT_USAGE_ERROR);
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;

    fn root() -> DeclarationRoot {
        DeclarationRoot {
            element: "phpunit".to_string(),
            attributes: vec![("bootstrap".to_string(), "vendor/autoload.php".to_string())],
        }
    }

    fn shards() -> Vec<Shard> {
        vec![
            Shard {
                index: 0,
                files: vec![
                    TestFile::new("/project/tests/ATest.php", "Test.php"),
                    TestFile::new("/project/tests/BTest.php", "Test.php"),
                ],
            },
            Shard {
                index: 1,
                files: vec![TestFile::new("/project/tests/C.phpt", ".phpt")],
            },
            Shard {
                index: 2,
                files: vec![],
            },
        ]
    }

    #[test]
    fn test_one_sub_suite_per_shard() {
        let declaration = synthesize(&root(), &shards());
        let names: Vec<&str> = declaration.suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["shard-0", "shard-1", "shard-2"]);
        assert!(declaration.suites[2].entries.is_empty());
        assert_eq!(declaration.root, root());
    }

    #[test]
    fn test_rendered_document_lists_files() {
        let declaration = synthesize(&root(), &shards());
        let xml = String::from_utf8(render_declaration(&declaration).unwrap()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<phpunit bootstrap=\"vendor/autoload.php\">"));
        assert!(xml.contains("<testsuite name=\"shard-0\">"));
        assert!(xml.contains("<file suffix=\"Test.php\">/project/tests/ATest.php</file>"));
        assert!(xml.contains("<file suffix=\".phpt\">/project/tests/C.phpt</file>"));
        assert!(xml.contains("<testsuite name=\"shard-2\"/>"));
        assert!(xml.ends_with("</phpunit>\n"));

        let a = xml.find("ATest.php").unwrap();
        let b = xml.find("BTest.php").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_rendered_document_reads_back() {
        let declaration = synthesize(&root(), &shards());
        let xml = String::from_utf8(render_declaration(&declaration).unwrap()).unwrap();

        let lookup = parse(&xml, "shard-1").unwrap();
        assert_eq!(lookup.root, root());
        assert_eq!(
            lookup.suites,
            vec!["shard-0".to_string(), "shard-1".to_string(), "shard-2".to_string()]
        );
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let declaration = synthesize(
            &root(),
            &[Shard {
                index: 0,
                files: vec![TestFile::new("/project/R&D/ATest.php", "Test.php")],
            }],
        );
        let xml = String::from_utf8(render_declaration(&declaration).unwrap()).unwrap();
        assert!(xml.contains("/project/R&amp;D/ATest.php"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_root_paths_become_absolute() {
        let root = DeclarationRoot {
            element: "phpunit".to_string(),
            attributes: vec![
                ("bootstrap".to_string(), "vendor/autoload.php".to_string()),
                ("colors".to_string(), "true".to_string()),
                ("cacheResultFile".to_string(), ".phpunit.cache/results".to_string()),
                ("cacheDirectory".to_string(), "/var/cache/phpunit".to_string()),
            ],
        };

        let rebased = rebase_root(&root, Path::new("/project"));
        assert_eq!(rebased.element, "phpunit");
        assert_eq!(
            rebased.attributes,
            vec![
                ("bootstrap".to_string(), "/project/vendor/autoload.php".to_string()),
                ("colors".to_string(), "true".to_string()),
                ("cacheResultFile".to_string(), "/project/.phpunit.cache/results".to_string()),
                ("cacheDirectory".to_string(), "/var/cache/phpunit".to_string()),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_rendered_bootstrap_is_absolute() {
        let declaration = synthesize(&rebase_root(&root(), Path::new("/project")), &shards());
        let xml = String::from_utf8(render_declaration(&declaration).unwrap()).unwrap();
        assert!(xml.contains("<phpunit bootstrap=\"/project/vendor/autoload.php\">"));
    }
}
