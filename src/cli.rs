//! # Command-Line Interface / 命令行接口
//!
//! Builds the `shard-runner` command tree with localized help text and
//! dispatches to the subcommands.
//!
//! 构建带有本地化帮助文本的 `shard-runner` 命令树，并分发到各子命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::cli::commands::run::RunArgs;
use crate::core::config::{DEFAULT_CONFIG_FILE, DEFAULT_ENGINE, DEFAULT_SUFFIX};
use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// Builds the command tree. Help text is rendered in the current locale.
pub fn build_cli() -> Command {
    Command::new("shard-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about").to_string())
                .arg(
                    Arg::new("suite")
                        .help(t!("arg_suite").to_string())
                        .value_name("SUITE")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("declaration")
                        .short('d')
                        .long("declaration")
                        .help(t!("arg_declaration").to_string())
                        .value_name("DECLARATION")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output").to_string())
                        .value_name("OUTPUT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("workers")
                        .short('j')
                        .long("workers")
                        .help(t!("arg_workers").to_string())
                        .value_name("WORKERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("suffix")
                        .long("suffix")
                        .help(t!("arg_suffix", default = DEFAULT_SUFFIX).to_string())
                        .value_name("SUFFIX")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("prepend")
                        .long("prepend")
                        .help(t!("arg_prepend").to_string())
                        .value_name("PREPEND")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help(t!("arg_dry_run").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("exit-code")
                        .long("exit-code")
                        .help(t!("arg_exit_code").to_string())
                        .value_name("CODE")
                        .value_parser(clap::value_parser!(u8))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("engine")
                        .long("engine")
                        .help(t!("arg_engine", default = DEFAULT_ENGINE).to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help(t!("arg_project_dir").to_string())
                        .value_name("PROJECT_DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", default = DEFAULT_CONFIG_FILE).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg_html").to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about").to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_init_output").to_string())
                        .value_name("OUTPUT")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args(matches: &ArgMatches, lang_explicit: bool) -> RunArgs {
    RunArgs {
        suite: matches.get_one::<String>("suite").cloned().unwrap_or_default(),
        declaration: matches
            .get_one::<PathBuf>("declaration")
            .cloned()
            .unwrap_or_default(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        workers: matches.get_one::<usize>("workers").copied(),
        suffix: matches.get_one::<String>("suffix").cloned(),
        prepend: matches.get_one::<PathBuf>("prepend").cloned(),
        dry_run: matches.get_flag("dry-run"),
        exit_code: matches.get_one::<u8>("exit-code").copied(),
        engine: matches.get_one::<String>("engine").cloned(),
        project_dir: matches.get_one::<PathBuf>("project-dir").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        lang_explicit,
    }
}

/// Parses the command line and runs the selected subcommand.
///
/// Returns the process exit code the run asks for.
///
/// # Errors
/// Returns fatal errors (configuration, unknown suite, no tests, I/O) with
/// context; `main` turns them into an exit code.
pub async fn run() -> Result<u8> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    match &language {
        Some(lang) => crate::set_language(lang),
        None => crate::init(),
    }

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_args(run_matches, language.is_some())).await
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::init::execute(&output, init_matches.get_flag("force"))?;
            Ok(0)
        }
        // `subcommand_required` makes clap exit with usage before we get here.
        _ => Ok(0),
    }
}
