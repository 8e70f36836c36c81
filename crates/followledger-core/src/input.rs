//! CSV export loading.
//!
//! An export is a table with one column per time point; each cell holds a
//! username. The not-following-back set for a date comes from one of:
//!
//! - a column whose header is the date plus a suffix (`6/1/2025.1`);
//! - a second column carrying the same date header, as spreadsheet exports
//!   produce when two lists share a date;
//! - a companion table with the same date headers.
//!
//! Only date-like headers (containing `/`, or parsing as a date) name time
//! points; other columns such as notes or row numbers are skipped.

use crate::errors::{LedgerError, Result};
use crate::extract::MembershipSets;
use crate::timepoint::{parse_header, TimePointInput};
use followledger_core_types::schema::EVENT_COLUMN_SKIPPED;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default suffix marking a not-following-back column
pub const DEFAULT_NOT_FOLLOWING_BACK_SUFFIX: &str = ".1";

/// Where the not-following-back sets live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLayout {
    /// Same table, suffixed or repeated headers
    SuffixedColumns { suffix: String },
    /// Separate table keyed by the same headers
    CompanionTable { path: PathBuf },
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout::SuffixedColumns {
            suffix: DEFAULT_NOT_FOLLOWING_BACK_SUFFIX.to_string(),
        }
    }
}

/// One column of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub cells: Vec<String>,
}

/// Load every time point from `path`, in column order
///
/// # Errors
///
/// - `InputNotFound` if a table file does not exist
/// - `Io` if a table file cannot be read
/// - `InvalidCsv` if a table is not valid CSV
pub fn load_time_points(path: &Path, layout: &TableLayout) -> Result<Vec<TimePointInput>> {
    let columns = read_table(path)?;
    match layout {
        TableLayout::SuffixedColumns { suffix } => Ok(split_columns(columns, suffix)),
        TableLayout::CompanionTable { path: companion } => {
            let nfb_columns = read_table(companion)?;
            Ok(pair_tables(columns, nfb_columns))
        }
    }
}

/// Read a CSV file into columns
pub fn read_table(path: &Path) -> Result<Vec<Column>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LedgerError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => LedgerError::io(format!("open {}", path.display()), e),
    })?;
    read_columns(file, &path.display().to_string())
}

/// Read CSV from any reader; `label` names the source in errors
pub fn read_columns<R: Read>(reader: R, label: &str) -> Result<Vec<Column>> {
    let invalid = |e: csv::Error| LedgerError::InvalidCsv {
        path: label.to_string(),
        reason: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut columns: Vec<Column> = rdr
        .headers()
        .map_err(invalid)?
        .iter()
        .map(|h| Column {
            header: h.trim().to_string(),
            cells: Vec::new(),
        })
        .collect();

    for record in rdr.records() {
        let record = record.map_err(invalid)?;
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.cells.push(cell.to_string());
        }
    }

    tracing::debug!(
        op = "read_columns",
        source = label,
        columns = columns.len(),
    );
    Ok(columns)
}

/// True when `header` names a time point
///
/// Headers with a `/` count even if the date is invalid; those fall back
/// to the current time later.
pub fn is_time_point_header(header: &str) -> bool {
    header.contains('/') || parse_header(header).is_some()
}

fn keep_column(header: &str) -> bool {
    if header.is_empty() {
        return false;
    }
    let keep = is_time_point_header(header);
    if !keep {
        tracing::warn!(
            component = module_path!(),
            op = "load_time_points",
            event = EVENT_COLUMN_SKIPPED,
            column = header,
            "column header is not a date, skipped"
        );
    }
    keep
}

#[derive(Default)]
struct Pending {
    followed: Option<Vec<String>>,
    not_following_back: Vec<String>,
}

/// Pair following columns with their not-following-back columns
///
/// Time points are returned in order of first appearance. Blank and
/// non-date headers are skipped.
pub fn split_columns(columns: Vec<Column>, suffix: &str) -> Vec<TimePointInput> {
    let mut order: Vec<String> = Vec::new();
    let mut pending: HashMap<String, Pending> = HashMap::new();

    for column in columns {
        if column.header.is_empty() {
            continue;
        }

        let suffixed_base = (!suffix.is_empty())
            .then(|| column.header.strip_suffix(suffix))
            .flatten()
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .map(str::to_string);

        let (base, is_nfb) = match suffixed_base {
            Some(base) => (base, true),
            None => {
                let repeated = pending
                    .get(&column.header)
                    .is_some_and(|p| p.followed.is_some());
                (column.header, repeated)
            }
        };

        if !keep_column(&base) {
            continue;
        }

        let slot = pending.entry(base.clone()).or_insert_with(|| {
            order.push(base.clone());
            Pending::default()
        });

        if is_nfb {
            slot.not_following_back.extend(column.cells);
        } else {
            slot.followed = Some(column.cells);
        }
    }

    order
        .into_iter()
        .filter_map(|header| {
            let slot = pending.remove(&header)?;
            Some(finish(header, slot))
        })
        .collect()
}

/// Pair a following table with a companion not-following-back table
pub fn pair_tables(followed: Vec<Column>, not_following_back: Vec<Column>) -> Vec<TimePointInput> {
    let mut order: Vec<String> = Vec::new();
    let mut pending: HashMap<String, Pending> = HashMap::new();

    for column in followed.into_iter().filter(|c| keep_column(&c.header)) {
        let slot = pending.entry(column.header.clone()).or_insert_with(|| {
            order.push(column.header.clone());
            Pending::default()
        });
        slot.followed
            .get_or_insert_with(Vec::new)
            .extend(column.cells);
    }

    for column in not_following_back
        .into_iter()
        .filter(|c| keep_column(&c.header))
    {
        let slot = pending.entry(column.header.clone()).or_insert_with(|| {
            order.push(column.header.clone());
            Pending::default()
        });
        slot.not_following_back.extend(column.cells);
    }

    order
        .into_iter()
        .filter_map(|header| {
            let slot = pending.remove(&header)?;
            Some(finish(header, slot))
        })
        .collect()
}

fn finish(header: String, slot: Pending) -> TimePointInput {
    let followed = slot.followed.unwrap_or_else(|| {
        tracing::warn!(
            component = module_path!(),
            op = "load_time_points",
            time_point = header.as_str(),
            "not-following-back column has no following column"
        );
        Vec::new()
    });
    TimePointInput {
        sets: MembershipSets::from_raw(followed, slot.not_following_back),
        header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(csv: &str) -> Vec<Column> {
        read_columns(csv.as_bytes(), "inline").unwrap()
    }

    #[test]
    fn test_suffixed_columns() {
        let csv = "6/1/2025,6/1/2025.1,6/30/2025,6/30/2025.1\n\
                   a,b,a,\n\
                   b,,c,\n\
                   c,,,\n";
        let tps = split_columns(columns(csv), ".1");

        assert_eq!(tps.len(), 2);
        assert_eq!(tps[0].header, "6/1/2025");
        assert_eq!(tps[0].sets.followed.len(), 3);
        assert!(tps[0].sets.not_following_back.contains("b"));
        assert_eq!(tps[1].sets.followed.len(), 2);
        assert!(tps[1].sets.not_following_back.is_empty());
    }

    #[test]
    fn test_repeated_header_is_not_following_back() {
        let csv = "6/1/2025,6/1/2025\na,b\nb,\n";
        let tps = split_columns(columns(csv), ".1");

        assert_eq!(tps.len(), 1);
        assert!(tps[0].sets.followed.contains("a"));
        assert!(tps[0].sets.not_following_back.contains("b"));
    }

    #[test]
    fn test_ragged_rows_and_blank_headers() {
        let csv = ",6/1/2025\n0,a\n1\n2,b\n";
        let tps = split_columns(columns(csv), ".1");

        assert_eq!(tps.len(), 1);
        assert_eq!(tps[0].sets.followed.len(), 2);
    }

    #[test]
    fn test_orphan_not_following_back_column() {
        let csv = "6/1/2025.1\nghost\n";
        let tps = split_columns(columns(csv), ".1");

        assert_eq!(tps.len(), 1);
        assert_eq!(tps[0].header, "6/1/2025");
        assert!(tps[0].sets.followed.is_empty());
        assert!(tps[0].sets.not_following_back.contains("ghost"));
    }

    #[test]
    fn test_companion_table() {
        let followed = columns("6/1/2025,7/1/2025\na,a\nb,\n");
        let nfb = columns("6/1/2025,7/1/2025\nb,a\n");
        let tps = pair_tables(followed, nfb);

        assert_eq!(tps.len(), 2);
        assert!(tps[0].sets.not_following_back.contains("b"));
        assert!(tps[1].sets.not_following_back.contains("a"));
        assert_eq!(tps[1].sets.followed.len(), 1);
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = read_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LedgerError::InputNotFound { .. }));
    }

    #[test]
    fn test_non_date_columns_are_skipped() {
        let csv = "Notes,6/1/2025,6/1/2025.1,Rank
remember,a,b,1
,b,,2
";
        let tps = split_columns(columns(csv), ".1");

        assert_eq!(tps.len(), 1);
        assert_eq!(tps[0].header, "6/1/2025");
        assert!(!tps[0].sets.followed.contains("remember"));
        assert!(tps[0].sets.not_following_back.contains("b"));
    }

    #[test]
    fn test_companion_tables_skip_non_date_columns() {
        let followed = columns("6/1/2025,comment
a,x
");
        let nfb = columns("6/1/2025,comment
a,y
");
        let tps = pair_tables(followed, nfb);

        assert_eq!(tps.len(), 1);
        assert!(tps[0].sets.not_following_back.contains("a"));
    }

    #[test]
    fn test_time_point_header_detection() {
        assert!(is_time_point_header("6/1/2025"));
        assert!(is_time_point_header("2025-06-01"));
        assert!(is_time_point_header("13/45/2025"));
        assert!(!is_time_point_header("Notes"));
        assert!(!is_time_point_header("Unnamed: 0"));
    }
}
