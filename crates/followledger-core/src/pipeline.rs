//! End-to-end operations with boundary logging.
//!
//! This module owns lifecycle logging for the two runs the tool offers:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower modules use only `tracing::debug!()` and `tracing::warn!()`.

use crate::assemble::assemble_now;
use crate::config::LedgerConfig;
use crate::enrich::{enrich_file, find_latest_snapshot, EnrichReport};
use crate::errors::Result;
use crate::input::{load_time_points, TableLayout};
use crate::model::Document;
use crate::output::write_document;
use crate::reduce::{reconcile, ReductionStats};
use crate::timepoint::{resolve_time_points, TimePointInput};
use crate::{log_op_end, log_op_error, log_op_start};
use std::path::{Path, PathBuf};

/// Everything a reconcile run needs
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub input: PathBuf,
    pub layout: TableLayout,
    pub output: PathBuf,
    pub config: LedgerConfig,
}

/// Summary of a finished reconcile run
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub output: PathBuf,
    pub stats: ReductionStats,
    pub document: Document,
}

/// Run extraction, reduction, and assembly over loaded time points
///
/// Pure apart from the wall-clock `enriched_at` stamp.
pub fn build_document(
    inputs: Vec<TimePointInput>,
    config: &LedgerConfig,
) -> (Document, ReductionStats) {
    let time_points = resolve_time_points(inputs);
    let ids = config.id_strategy.build();
    let (snapshots, stats) = reconcile(&time_points, ids.as_ref(), config.reducer_options());
    (assemble_now(&config.account_info(), snapshots), stats)
}

/// Load the export, build the document, and write it atomically
///
/// # Errors
///
/// Any input or write failure; no output is written in that case.
pub fn run_reconcile(request: &ReconcileRequest) -> Result<ReconcileOutcome> {
    let input = request.input.display().to_string();
    log_op_start!("reconcile", input = input.as_str());
    let start = std::time::Instant::now();

    let result = reconcile_impl(request).map_err(|e| {
        log_op_error!(
            "reconcile",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "reconcile",
        duration_ms = start.elapsed().as_millis() as u64,
        time_points = result.stats.time_points as u64,
        snapshot_count = result.stats.snapshots_emitted as u64,
        entry_count = result.stats.entries_emitted as u64,
        user_count = result.stats.unique_users as u64
    );

    Ok(result)
}

fn reconcile_impl(request: &ReconcileRequest) -> Result<ReconcileOutcome> {
    let inputs = load_time_points(&request.input, &request.layout)?;
    let (document, stats) = build_document(inputs, &request.config);
    write_document(&request.output, &document)?;
    Ok(ReconcileOutcome {
        output: request.output.clone(),
        stats,
        document,
    })
}

/// Summary of a finished enrich run
#[derive(Debug, Clone)]
pub struct EnrichOutcome {
    pub source: PathBuf,
    pub report: EnrichReport,
}

/// Enrich `output` from `source`, or from the latest snapshot file in `dir`
///
/// # Errors
///
/// Any read, structure, or write failure; `output` is untouched in that case.
pub fn run_enrich(output: &Path, source: Option<&Path>, dir: &Path) -> Result<EnrichOutcome> {
    let target = output.display().to_string();
    log_op_start!("enrich", output = target.as_str());
    let start = std::time::Instant::now();

    let result = enrich_impl(output, source, dir).map_err(|e| {
        log_op_error!(
            "enrich",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "enrich",
        duration_ms = start.elapsed().as_millis() as u64,
        entry_count = result.report.entries_updated as u64,
        account_replaced = result.report.account_replaced
    );

    Ok(result)
}

fn enrich_impl(output: &Path, source: Option<&Path>, dir: &Path) -> Result<EnrichOutcome> {
    let source = match source {
        Some(path) => path.to_path_buf(),
        None => find_latest_snapshot(dir)?,
    };
    let report = enrich_file(output, &source)?;
    Ok(EnrichOutcome { source, report })
}
