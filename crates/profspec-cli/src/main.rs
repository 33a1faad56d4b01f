//! # profspec CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, loads the
//! engine configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use profspec_cli::{init_tracing, load_config};
use profspec_cli::rules::{run_rules, RulesArgs};
use profspec_cli::selftest::{run_selftest, SelftestArgs};
use profspec_cli::validate::{run_validate, ValidateArgs};

/// profspec — validate profile documents against named rule sets.
#[derive(Parser, Debug)]
#[command(name = "profspec", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write log lines to stderr as JSON objects.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to an engine configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON or YAML document against a rule.
    Validate(ValidateArgs),

    /// List the rules registered by a rule set.
    Rules(RulesArgs),

    /// Run the built-in cases of a rule set and print the report table.
    Selftest(SelftestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("profspec CLI starting");

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    tracing::debug!(max_depth = config.max_depth, "loaded engine configuration");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Rules(args) => run_rules(&args, &config),
        Commands::Selftest(args) => run_selftest(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
