//! # Pipeline Module / 流水线模块
//!
//! Wires the components together: parse, discover, partition, synthesize,
//! dispatch, aggregate. Data only flows downward through these steps.
//!
//! 将各组件连接起来：解析、发现、分区、合成、分发、聚合。数据只沿这些步骤向下流动。

use colored::*;
use std::path::{Path, PathBuf};

use crate::core::aggregate::aggregate;
use crate::core::config::RunSettings;
use crate::core::context::{RunContext, Teardown};
use crate::core::discovery::discover_suite;
use crate::core::error::ShardError;
use crate::core::execution::{DispatchMode, dispatch, plan_invocations};
use crate::core::models::RunOutcome;
use crate::core::planner::partition;
use crate::core::suite::parse_suite;
use crate::core::synthesis::{rebase_root, synthesize, validate_output_path, write_config};
use crate::infra::command::EngineCommand;
use crate::infra::t;

/// Runs one sharded suite end to end.
///
/// Every artifact is registered with `teardown` before it is created. When
/// at least one shard fails, the status record is marked to survive teardown.
/// In dry-run mode the synthesized configuration is released from teardown so
/// it can be inspected.
///
/// 端到端运行一个分片套件。
///
/// # Errors
/// Fails fast with a configuration error before touching the filesystem when
/// the settings are invalid; returns [`ShardError::SuiteNotFound`] when the
/// suite is absent or empty and [`ShardError::NoTestsDiscovered`] when none of
/// its directories holds a matching file. A failing shard is not an error.
pub async fn run_sharded_suite(
    settings: &RunSettings,
    context: &RunContext,
    teardown: &mut Teardown,
) -> Result<RunOutcome, ShardError> {
    settings.validate()?;
    let config_path = settings
        .output
        .clone()
        .unwrap_or_else(|| context.default_config_path());
    validate_output_path(&config_path)?;
    // Workers run in the project directory, so they need an absolute path.
    let config_path = std::path::absolute(&config_path).map_err(|err| {
        ShardError::io(format!("failed to resolve '{}'", config_path.display()), err)
    })?;
    let engine = EngineCommand::parse(&settings.engine)?;

    let document = std::fs::read_to_string(&settings.declaration).map_err(|err| {
        ShardError::io(
            format!("failed to read suite declaration '{}'", settings.declaration.display()),
            err,
        )
    })?;
    let lookup = parse_suite(&document, &settings.suite, &settings.declaration)?;
    if lookup.directories.is_empty() {
        tracing::debug!(declared = ?lookup.suites, "suite lookup came back empty");
        return Err(ShardError::SuiteNotFound {
            suite: settings.suite.clone(),
        });
    }

    let base = declaration_base(&settings.declaration);
    let base = std::path::absolute(&base)
        .map_err(|err| ShardError::io(format!("failed to resolve '{}'", base.display()), err))?;
    let files = discover_suite(&lookup.directories, &base, &settings.suffix)?;
    if files.is_empty() {
        return Err(ShardError::NoTestsDiscovered {
            suite: settings.suite.clone(),
            suffix: settings.suffix.clone(),
        });
    }

    let plan = partition(files, settings.workers);
    println!(
        "{}",
        t!(
            "plan.summary",
            files = plan.total_files,
            shards = plan.shards.len(),
            size = plan.shard_size,
            busy = plan.non_empty_shards()
        )
        .bold()
    );

    std::fs::create_dir_all(context.scratch_dir()).map_err(|err| {
        ShardError::io(
            format!("failed to create scratch directory '{}'", context.scratch_dir().display()),
            err,
        )
    })?;

    teardown.track(&config_path);
    write_config(&synthesize(&rebase_root(&lookup.root, &base), &plan.shards), &config_path)?;

    let invocations = plan_invocations(
        &engine,
        &settings.engine_args,
        &config_path,
        settings.prepend.as_deref(),
        &plan.shards,
        context,
    );
    for invocation in &invocations {
        teardown.track(&invocation.sink);
    }

    let mode = if settings.dry_run {
        teardown.release(&config_path);
        println!("{}", t!("plan.config_kept", path = config_path.display()).cyan());
        DispatchMode::DryRun
    } else {
        DispatchMode::Execute
    };

    let status_record = context.status_record_path();
    let results = dispatch(invocations, &settings.project_dir, &status_record, mode).await;
    let outcome = aggregate(results, settings.failure_exit_code, status_record);

    if !outcome.is_success() {
        teardown.preserve_status_record();
    }
    Ok(outcome)
}

/// Directory that relative `<directory>` entries are resolved against.
fn declaration_base(declaration: &Path) -> PathBuf {
    match declaration.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
