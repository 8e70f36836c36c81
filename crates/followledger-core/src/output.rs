//! Document persistence
//!
//! Writes go through a temp file in the target directory followed by a
//! rename, so a failed run never leaves a partial document behind.

use crate::errors::{LedgerError, Result};
use crate::model::Document;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LedgerError::io("create_output_dir", e))?;
    }

    let temp_path = temp_path_for(target_path)?;

    fs::write(&temp_path, content).map_err(|e| LedgerError::io("write_output_temp", e))?;

    fs::rename(&temp_path, target_path).map_err(|e| {
        fs::remove_file(&temp_path).ok();
        LedgerError::io("rename_output_temp", e)
    })?;

    Ok(())
}

/// Sibling of `target_path` named `<file name>.tmp`
fn temp_path_for(target_path: &Path) -> Result<PathBuf> {
    let mut name = target_path
        .file_name()
        .ok_or_else(|| LedgerError::Io {
            operation: "write_output_temp".to_string(),
            message: format!("{} has no file name", target_path.display()),
        })?
        .to_os_string();
    name.push(".tmp");
    Ok(target_path.with_file_name(name))
}

/// Serialize any value as indented JSON and write it atomically
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

/// Serialize a document as indented JSON and write it atomically
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    write_json(path, document)
}

/// Read and parse a document
///
/// # Errors
///
/// - `InputNotFound` if the file does not exist
/// - `Io` if it cannot be read
/// - `InvalidDocument` if it is not a document
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|e| LedgerError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LedgerError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => LedgerError::io(format!("read {}", path.display()), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{assemble, AccountInfo};
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("output.json");

        atomic_write(&target, b"hello").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("subdir").join("output.json");

        atomic_write(&target, b"nested").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("output.json");

        atomic_write(&target, b"clean").unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| s.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count();

        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_target_with_tmp_extension_is_written_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("ledger.tmp");
        fs::write(&target, b"old").unwrap();

        assert_eq!(
            temp_path_for(&target).unwrap(),
            temp_dir.path().join("ledger.tmp.tmp")
        );
        atomic_write(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!temp_dir.path().join("ledger.tmp.tmp").exists());
    }

    #[test]
    fn test_document_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("output.json");
        let doc = assemble(
            &AccountInfo::new("me", "", "https://instagram.com/"),
            vec![],
            "2025-10-01T00:00:00".to_string(),
        );

        write_document(&target, &doc).unwrap();

        assert_eq!(read_document(&target).unwrap(), doc);
    }

    #[test]
    fn test_read_document_rejects_non_document() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bad.json");
        fs::write(&target, b"{\"snapshots\": 3}").unwrap();

        let err = read_document(&target).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDocument { .. }));
    }
}
