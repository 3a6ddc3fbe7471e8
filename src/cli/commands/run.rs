//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command for the Shard Runner CLI:
//! it resolves settings from flags and the optional configuration file,
//! runs the sharded suite and reports the outcome.
//!
//! 此模块实现了 Shard Runner CLI 的 `run` 命令：
//! 它根据命令行参数和可选配置文件解析设置，运行分片套件并报告结果。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::core::{
    RunContext, ShardError, Teardown,
    config::{RunSettings, RunnerConfig, resolve_runner_config, worker_count},
    run_sharded_suite,
};
use crate::infra::t;
use crate::reporting::{generate_html_report, print_combined_output, print_summary};

/// Arguments of the `run` subcommand as given on the command line.
/// `None` means "not given", so the configuration file or default applies.
///
/// `run` 子命令在命令行上给出的参数。`None` 表示未给出，此时使用配置文件或默认值。
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub suite: String,
    pub declaration: PathBuf,
    pub output: Option<PathBuf>,
    pub workers: Option<usize>,
    pub suffix: Option<String>,
    pub prepend: Option<PathBuf>,
    pub dry_run: bool,
    pub exit_code: Option<u8>,
    pub engine: Option<String>,
    pub project_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub html: Option<PathBuf>,
    /// Whether `--lang` was given, which wins over the file's `language`.
    pub lang_explicit: bool,
}

impl RunArgs {
    /// Resolves the run settings: flags over `config` over defaults.
    ///
    /// # Errors
    /// Returns [`ShardError::Configuration`] for a zero worker count, given
    /// either as a flag or in the config file.
    pub fn settings(&self, config: &RunnerConfig) -> Result<RunSettings, ShardError> {
        let mut settings = RunSettings::new(self.suite.clone(), self.declaration.clone());
        settings.apply_config(config)?;

        if let Some(workers) = self.workers {
            settings.workers = worker_count(workers)?;
        }
        if let Some(suffix) = &self.suffix {
            settings.suffix = suffix.clone();
        }
        if let Some(engine) = &self.engine {
            settings.engine = engine.clone();
        }
        if let Some(code) = self.exit_code {
            settings.failure_exit_code = Some(code);
        }
        if let Some(project_dir) = &self.project_dir {
            settings.project_dir = project_dir.clone();
        }
        settings.output = self.output.clone();
        settings.prepend = self.prepend.clone();
        settings.dry_run = self.dry_run;
        Ok(settings)
    }
}

/// Executes the run command.
///
/// # Returns
/// The exit code of the run: `0` when every shard passed, the failure code
/// otherwise.
///
/// # Errors
/// Returns fatal configuration, discovery and I/O errors. Run artifacts are
/// removed before the error reaches the caller.
pub async fn execute(args: RunArgs) -> Result<u8> {
    let config = resolve_runner_config(args.config.as_deref(), Path::new("."))
        .with_context(|| t!("run.config_load_failed").to_string())?;
    if !args.lang_explicit {
        if let Some(language) = &config.language {
            crate::set_language(language);
        }
    }

    let settings = args.settings(&config)?;
    let scratch_dir = config.scratch_dir.clone().unwrap_or_else(std::env::temp_dir);
    let context = RunContext::new(scratch_dir);
    let mut teardown = Teardown::new(&context);

    println!(
        "{}",
        t!(
            "run.starting",
            suite = &settings.suite,
            path = settings.declaration.display(),
            workers = settings.workers
        )
        .bold()
    );
    tracing::debug!(token = context.token(), scratch = %context.scratch_dir().display(), "run context created");

    let outcome = run_sharded_suite(&settings, &context, &mut teardown)
        .await
        .with_context(|| t!("run.failed", suite = &settings.suite).to_string())?;

    print_combined_output(&outcome);
    print_summary(&outcome);

    if let Some(report_path) = &args.html {
        println!("\n{}", t!("run.html_generating", path = report_path.display()));
        if let Err(e) = generate_html_report(&outcome, report_path) {
            eprintln!("{} {}", t!("run.html_failed").red(), e);
        }
    }

    Ok(outcome.exit_code)
}
