use colored::*;
use shard_runner::cli;
use shard_runner::error::{EXIT_INTERNAL_ERROR, ShardError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match cli::run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            let code = e
                .downcast_ref::<ShardError>()
                .map_or(EXIT_INTERNAL_ERROR, ShardError::exit_code);
            ExitCode::from(code)
        }
    }
}
