//! # Run Context Unit Tests / 运行上下文单元测试
//!
//! Tests for run-scoped artifact naming and the teardown guard.
//!
//! 测试运行级产物命名和清理守卫。

use shard_runner::core::{RunContext, Teardown};
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

#[cfg(test)]
mod context_tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_per_run() {
        let first = RunContext::new("/tmp");
        let second = RunContext::new("/tmp");
        assert_ne!(first.token(), second.token());
        assert_ne!(first.status_record_path(), second.status_record_path());
        assert_ne!(first.default_config_path(), second.default_config_path());
    }

    #[test]
    fn test_token_shape() {
        let context = RunContext::new("/tmp");
        assert_eq!(context.token().len(), 10);
        assert!(
            context
                .token()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_artifact_names() {
        let context = RunContext::with_token("/scratch", "abc123");
        assert_eq!(
            context.sink_path(3).to_string_lossy(),
            "/scratch/shard-runner-abc123-shard-3.out"
        );
        assert_eq!(
            context.status_record_path().to_string_lossy(),
            "/scratch/shard-runner-abc123-statuses.jsonl"
        );
        assert_eq!(
            context.default_config_path().to_string_lossy(),
            "/scratch/shard-runner-abc123.xml"
        );
    }

    #[test]
    fn test_sinks_are_exclusive() {
        let context = RunContext::with_token("/scratch", "abc123");
        let sinks: HashSet<_> = (0..64).map(|shard| context.sink_path(shard)).collect();
        assert_eq!(sinks.len(), 64);
        assert!(!sinks.contains(&context.status_record_path()));
    }
}

#[cfg(test)]
mod teardown_tests {
    use super::*;

    #[test]
    fn test_drop_removes_tracked_files_and_status_record() {
        let temp = tempdir().unwrap();
        let context = RunContext::new(temp.path());
        let config = context.default_config_path();
        let sink = context.sink_path(0);
        for path in [&config, &sink, &context.status_record_path()] {
            fs::write(path, "x").unwrap();
        }

        {
            let mut teardown = Teardown::new(&context);
            teardown.track(&config);
            teardown.track(&sink);
            teardown.track(&sink);
            assert_eq!(teardown.tracked().len(), 2);
        }

        assert!(!config.exists());
        assert!(!sink.exists());
        assert!(!context.status_record_path().exists());
    }

    #[test]
    fn test_preserved_status_record_survives() {
        let temp = tempdir().unwrap();
        let context = RunContext::new(temp.path());
        fs::write(context.status_record_path(), "{\"shard\":0,\"status\":1}\n").unwrap();

        {
            let mut teardown = Teardown::new(&context);
            teardown.preserve_status_record();
            assert!(teardown.status_record_preserved());
        }

        assert!(context.status_record_path().exists());
    }

    #[test]
    fn test_released_file_survives() {
        let temp = tempdir().unwrap();
        let context = RunContext::new(temp.path());
        let config = context.default_config_path();
        fs::write(&config, "<phpunit/>").unwrap();

        {
            let mut teardown = Teardown::new(&context);
            teardown.track(&config);
            teardown.release(&config);
            assert!(teardown.tracked().is_empty());
        }

        assert!(config.exists());
    }

    #[test]
    fn test_missing_artifacts_are_fine() {
        let temp = tempdir().unwrap();
        let context = RunContext::new(temp.path());
        let mut teardown = Teardown::new(&context);
        teardown.track(context.sink_path(7));
        drop(teardown);
        assert!(temp.path().read_dir().unwrap().next().is_none());
    }
}
