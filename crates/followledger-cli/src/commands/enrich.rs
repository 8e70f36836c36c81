//! Enrich command
//!
//! Usage: followledger enrich [--output <FILE>] [--source <FILE> | --dir <DIR>]

use clap::Args;
use followledger_core::pipeline::run_enrich;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Document to enrich in place
    #[arg(short, long, default_value = "output.json")]
    pub output: PathBuf,

    /// Snapshot file to take user records from
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory searched for the latest snapshot_*.json when no source is given
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

/// Execute enrich command
pub fn execute(args: EnrichArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = run_enrich(&args.output, args.source.as_deref(), &args.dir)?;

    println!(
        "✓ Enriched {} from {}",
        args.output.display(),
        outcome.source.display()
    );
    println!("  entries updated: {}", outcome.report.entries_updated);
    if outcome.report.account_replaced {
        println!("  account replaced");
    }

    Ok(())
}
