//! Enrichment of an existing document from a richer snapshot file.
//!
//! A snapshot file (same JSON family as the output document) carries full
//! user records in its first snapshot. Every change entry whose username
//! matches one of those records, ignoring case, receives the record's
//! fields. Relationship fields already on the entry are never replaced.
//!
//! The output file is only written after both files were read and the
//! overlay succeeded.

use crate::errors::{LedgerError, Result};
use crate::model::{Account, Document};
use crate::output::{read_bytes, write_json};
use crate::timepoint::iso_now;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fields that keep the entry's value when it already has one
pub const PRESERVED_FIELDS: &[&str] = &[
    "follower",
    "following",
    "order_index",
    "order_index_following",
];

/// Outcome of one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub entries_updated: usize,
    pub source_users: usize,
    pub account_replaced: bool,
}

/// Index the first snapshot's users of `source` by lowercased username
///
/// Users come from `changed_users`, or from `followers` and `following`
/// when the snapshot uses the split layout.
///
/// # Errors
///
/// `MissingStructure` if there is no first snapshot holding users.
pub fn index_source_users(
    source: &Value,
    label: &str,
) -> Result<HashMap<String, Map<String, Value>>> {
    let missing = |structure: &str| LedgerError::MissingStructure {
        path: label.to_string(),
        structure: structure.to_string(),
    };

    let first = source
        .get("snapshots")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
        .ok_or_else(|| missing("snapshots[0]"))?;

    let users: Vec<&Value> = match first.get("changed_users").and_then(Value::as_array) {
        Some(changed) if !changed.is_empty() => changed.iter().collect(),
        _ => ["followers", "following"]
            .iter()
            .filter_map(|key| first.get(*key).and_then(Value::as_array))
            .flatten()
            .collect(),
    };

    if users.is_empty() {
        return Err(missing("snapshots[0].changed_users"));
    }

    let mut index: HashMap<String, Map<String, Value>> = HashMap::new();
    for user in users {
        let Some(obj) = user.as_object() else {
            continue;
        };
        let Some(username) = obj.get("username").and_then(Value::as_str) else {
            tracing::warn!(
                component = module_path!(),
                op = "index_source_users",
                source = label,
                "source user without username skipped"
            );
            continue;
        };
        // Split layouts list mutuals twice; merge so neither copy loses fields.
        index
            .entry(username.to_lowercase())
            .or_default()
            .extend(obj.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    Ok(index)
}

/// Overlay one source record onto a raw entry
///
/// Works on the entry as stored, so a field the entry never had is taken
/// from the source and no defaulted value is invented.
fn overlay_entry(target: &mut Map<String, Value>, source_user: &Map<String, Value>) {
    for (key, value) in source_user {
        let preserved = PRESERVED_FIELDS.contains(&key.as_str())
            && target.get(key).is_some_and(|v| !v.is_null());
        if !preserved {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Enrich a raw document value in place from a parsed snapshot `source`
///
/// `document` must already have the document shape; entries are matched
/// by username ignoring case. Nothing is changed when an error is returned.
pub fn enrich_value(
    document: &mut Value,
    source: &Value,
    label: &str,
    enriched_at: String,
) -> Result<EnrichReport> {
    let index = index_source_users(source, label)?;
    let mut report = EnrichReport {
        source_users: index.len(),
        ..EnrichReport::default()
    };

    let account = match source.get("account") {
        Some(raw) if raw.is_object() => {
            serde_json::from_value::<Account>(raw.clone()).map_err(|e| {
                LedgerError::InvalidDocument {
                    path: label.to_string(),
                    reason: format!("account: {}", e),
                }
            })?;
            Some(raw.clone())
        }
        _ => None,
    };

    let Some(root) = document.as_object_mut() else {
        return Err(LedgerError::InvalidDocument {
            path: label.to_string(),
            reason: "document is not an object".to_string(),
        });
    };

    let entries = root
        .get_mut("snapshots")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(|snapshot| snapshot.get_mut("changed_users"))
        .filter_map(Value::as_array_mut)
        .flatten()
        .filter_map(Value::as_object_mut);

    for entry in entries {
        let key = entry
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_lowercase);
        if let Some(source_user) = key.and_then(|k| index.get(&k)) {
            overlay_entry(entry, source_user);
            report.entries_updated += 1;
        }
    }

    if let Some(account) = account {
        root.insert("account".to_string(), account);
        report.account_replaced = true;
    }
    root.insert("enriched_at".to_string(), Value::String(enriched_at));

    Ok(report)
}

/// Enrich a typed `document` in memory from a parsed snapshot `source`
pub fn enrich_document(
    document: &mut Document,
    source: &Value,
    label: &str,
    enriched_at: String,
) -> Result<EnrichReport> {
    let mut raw = serde_json::to_value(&*document)?;
    let report = enrich_value(&mut raw, source, label, enriched_at)?;
    *document = serde_json::from_value(raw).map_err(|e| LedgerError::InvalidDocument {
        path: label.to_string(),
        reason: e.to_string(),
    })?;
    Ok(report)
}

/// Latest `snapshot_*.json` in `dir`, by file name
pub fn find_latest_snapshot(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| LedgerError::io(format!("list {}", dir.display()), e))?;

    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            (name.starts_with("snapshot_") && name.ends_with(".json")).then_some(name)
        })
        .max()
        .map(|name| dir.join(name))
        .ok_or_else(|| LedgerError::NoSnapshotSource {
            dir: dir.display().to_string(),
        })
}

fn read_json(path: &Path) -> Result<Value> {
    serde_json::from_slice(&read_bytes(path)?).map_err(|e| LedgerError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read `output_path`, enrich it from `source_path`, and write it back
///
/// The output is checked against the document shape but rewritten from
/// its raw JSON, so fields it lacked stay absent unless the source has them.
pub fn enrich_file(output_path: &Path, source_path: &Path) -> Result<EnrichReport> {
    let mut document = read_json(output_path)?;
    serde_json::from_value::<Document>(document.clone()).map_err(|e| {
        LedgerError::InvalidDocument {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    let source = read_json(source_path)?;
    let label = source_path.display().to_string();

    let report = enrich_value(&mut document, &source, &label, iso_now())?;
    write_json(output_path, &document)?;
    Ok(report)
}
