//! FollowLedger CLI
//!
//! Command-line interface for FollowLedger

use clap::{Parser, Subcommand, ValueEnum};
use followledger_core::logging_facility::{init, Profile};
use followledger_core_types::RunId;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "followledger")]
#[command(about = "FollowLedger - Follow relationship change log", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the change-log document from a CSV export
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Enrich an existing document from a snapshot file
    Enrich(commands::enrich::EnrichArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let run_id = RunId::new();
    let _run = tracing::info_span!("run", run_id = %run_id).entered();

    let result = match cli.command {
        Commands::Reconcile(args) => commands::reconcile::execute(args),
        Commands::Enrich(args) => commands::enrich::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
