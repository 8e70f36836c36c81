//! Reconcile command
//!
//! Usage: followledger reconcile <INPUT.csv> [--not-following-back <FILE>] [--config <FILE>]
//!        [--output <FILE>] [--username <U>] [--full-name <N>] [--id-strategy hash|random]
//!        [--suffix <SUFFIX>] [--order-index]

use clap::Args;
use followledger_core::identity::IdStrategyKind;
use followledger_core::input::TableLayout;
use followledger_core::pipeline::{run_reconcile, ReconcileRequest};
use followledger_core::LedgerConfig;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// CSV export with one column per date
    pub input: PathBuf,

    /// Companion CSV holding the not-following-back columns
    #[arg(long)]
    pub not_following_back: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output document path
    #[arg(short, long, default_value = "output.json")]
    pub output: PathBuf,

    /// Observing account username
    #[arg(long)]
    pub username: Option<String>,

    /// Observing account display name
    #[arg(long)]
    pub full_name: Option<String>,

    /// Identifier strategy: hash or random
    #[arg(long)]
    pub id_strategy: Option<IdStrategyKind>,

    /// Header suffix marking not-following-back columns
    #[arg(long)]
    pub suffix: Option<String>,

    /// Stamp order_index on emitted entries
    #[arg(long)]
    pub order_index: bool,
}

impl ReconcileArgs {
    /// Load the config file and apply flag overrides on top
    fn resolve_config(&self) -> followledger_core::Result<LedgerConfig> {
        let mut config = LedgerConfig::load_or_default(self.config.as_deref())?;
        if let Some(username) = &self.username {
            config.account.username = username.clone();
        }
        if let Some(full_name) = &self.full_name {
            config.account.full_name = full_name.clone();
        }
        if let Some(kind) = self.id_strategy {
            config.id_strategy = kind;
        }
        if let Some(suffix) = &self.suffix {
            config.not_following_back_suffix = suffix.clone();
        }
        if self.order_index {
            config.assign_order_index = true;
        }
        Ok(config)
    }
}

/// Execute reconcile command
pub fn execute(args: ReconcileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve_config()?;

    let layout = match &args.not_following_back {
        Some(path) => TableLayout::CompanionTable { path: path.clone() },
        None => config.suffixed_layout(),
    };

    let outcome = run_reconcile(&ReconcileRequest {
        input: args.input,
        layout,
        output: args.output,
        config,
    })?;

    println!("✓ Wrote {}", outcome.output.display());
    println!("  time points: {}", outcome.stats.time_points);
    println!("  snapshots:   {}", outcome.stats.snapshots_emitted);
    println!("  entries:     {}", outcome.stats.entries_emitted);
    println!("  users:       {}", outcome.stats.unique_users);

    Ok(())
}
