//! orgtract - organization names from ledger CSV files
//!
//! # Usage
//!
//! ```bash
//! # Resolve a semicolon-separated ledger, writing next to it
//! orgtract predict --data ledger.csv --output out/ --src-col HISTORICO --sep SEMICOLON
//!
//! # Batch mode: no prompts, merge labels within two extra tokens
//! orgtract predict -d ledger.csv -o out.csv --src-col desc --max-variation 2 --no-interactive
//!
//! # Inspect canonicalization
//! orgtract canonicalize --trace "Beta S/A 03/2021"
//! ```
//!
//! Logging goes through `env_logger`. The default level is `info`;
//! `--verbose` and `--quiet` move it to `debug` and `warn`, and `RUST_LOG`
//! takes precedence over both.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

mod commands;
mod output;
mod parser;
mod progress;
mod prompt;
mod table;

use output::color;
use parser::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result: Result<(), String> = match cli.command {
        Commands::Predict(args) => commands::predict::run(args, cli.quiet),
        Commands::Canonicalize(args) => commands::canonicalize::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "orgtract", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
