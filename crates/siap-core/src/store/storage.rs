//! File-backed row storage shared by the entity stores
//!
//! One directory per table, one JSON file per row. The handle is opened once
//! at process start and injected into the stores that need it; there is no
//! lazily-initialized global.

use crate::error::{Result, SiapError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Tables known to the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Agendas,
    Dispositions,
    Documents,
    Notifications,
    AuditLogs,
}

impl Table {
    /// Directory name under the data root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Agendas => "agendas",
            Self::Dispositions => "dispositions",
            Self::Documents => "documents",
            Self::Notifications => "notifications",
            Self::AuditLogs => "audit_logs",
        }
    }

    /// Row file prefix, e.g. `agenda_42.json`
    fn row_prefix(&self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Agendas => "agenda",
            Self::Dispositions => "disposition",
            Self::Documents => "document",
            Self::Notifications => "notification",
            Self::AuditLogs => "audit",
        }
    }

    fn all() -> [Table; 6] {
        [
            Self::Users,
            Self::Agendas,
            Self::Dispositions,
            Self::Documents,
            Self::Notifications,
            Self::AuditLogs,
        ]
    }
}

/// Storage handle holding the data root and per-table id counters.
/// Ids are monotonic within a table and survive process restarts because the
/// counters are re-seeded from the highest id on disk.
pub struct Storage {
    root: PathBuf,
    counters: Mutex<HashMap<Table, i64>>,
}

impl Storage {
    /// Open the data root, creating the table directories and seeding the
    /// id counters. Any I/O failure here means persistence is unusable.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let mut counters = HashMap::new();
        for table in Table::all() {
            let dir = root.join(table.dir_name());
            fs::create_dir_all(&dir).map_err(|e| {
                SiapError::StorageUnavailable(format!(
                    "Failed to create table directory {:?}: {}",
                    dir, e
                ))
            })?;
            counters.insert(table, highest_row_id(&dir, table.row_prefix()));
        }

        log::info!("Opened storage at {}", root.display());

        Ok(Self {
            root,
            counters: Mutex::new(counters),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate the next id for a table
    pub(crate) fn next_id(&self, table: Table) -> i64 {
        let mut counters = self.counters.lock().expect("id counter lock poisoned");
        let next = counters.get(&table).copied().unwrap_or(0) + 1;
        counters.insert(table, next);
        next
    }

    fn table_dir(&self, table: Table) -> PathBuf {
        self.root.join(table.dir_name())
    }

    fn row_path(&self, table: Table, id: i64) -> PathBuf {
        self.table_dir(table)
            .join(format!("{}_{}.json", table.row_prefix(), id))
    }

    /// Write a row, replacing any previous version
    pub(crate) fn write_row<T: Serialize>(&self, table: Table, id: i64, row: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(row)
            .map_err(|e| SiapError::Serialization(format!("Failed to serialize row: {}", e)))?;

        fs::write(self.row_path(table, id), json).map_err(|e| {
            SiapError::StorageUnavailable(format!(
                "Failed to write {} row {}: {}",
                table.dir_name(),
                id,
                e
            ))
        })
    }

    /// Read a single row; absence is not an error
    pub(crate) fn read_row<T: DeserializeOwned>(&self, table: Table, id: i64) -> Result<Option<T>> {
        let path = self.row_path(table, id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| {
            SiapError::StorageUnavailable(format!(
                "Failed to read {} row {}: {}",
                table.dir_name(),
                id,
                e
            ))
        })?;

        let row = serde_json::from_str(&json)
            .map_err(|e| SiapError::Serialization(format!("Failed to deserialize row: {}", e)))?;
        Ok(Some(row))
    }

    /// Remove a row, reporting whether it existed
    pub(crate) fn remove_row(&self, table: Table, id: i64) -> Result<bool> {
        let path = self.row_path(table, id);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).map_err(|e| {
            SiapError::StorageUnavailable(format!(
                "Failed to delete {} row {}: {}",
                table.dir_name(),
                id,
                e
            ))
        })?;
        Ok(true)
    }

    /// Read every row in a table. Unreadable rows are skipped; an unreadable
    /// directory degrades to an empty result rather than failing the read.
    pub(crate) fn read_all<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>> {
        let dir = self.table_dir(table);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to read table directory {:?}: {}", dir, e);
                return Ok(Vec::new());
            }
        };

        let mut rows = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                match fs::read_to_string(&path) {
                    Ok(json) => {
                        if let Ok(row) = serde_json::from_str(&json) {
                            rows.push(row);
                        } else {
                            log::warn!("Skipping unreadable row file {:?}", path);
                        }
                    }
                    Err(e) => log::warn!("Skipping row file {:?}: {}", path, e),
                }
            }
        }

        Ok(rows)
    }
}

/// Apply the standard limit/offset window to an already-ordered list
pub(crate) fn page<T>(rows: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    rows.into_iter().skip(offset).take(limit).collect()
}

fn highest_row_id(dir: &Path, prefix: &str) -> i64 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut highest = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(rest) = name.strip_prefix(prefix).and_then(|s| s.strip_prefix('_')) else {
            continue;
        };
        if let Some(id) = rest.strip_suffix(".json").and_then(|s| s.parse::<i64>().ok()) {
            highest = highest.max(id);
        }
    }
    highest
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        label: String,
    }

    #[test]
    fn test_open_creates_table_directories() {
        let temp_dir = TempDir::new().unwrap();
        let _storage = Storage::open(temp_dir.path()).unwrap();

        for table in Table::all() {
            assert!(
                temp_dir.path().join(table.dir_name()).exists(),
                "table directory {} should exist",
                table.dir_name()
            );
        }
    }

    #[test]
    fn test_write_read_remove_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(temp_dir.path()).unwrap();

        let row = Row {
            id: 1,
            label: "first".to_string(),
        };
        storage.write_row(Table::Agendas, 1, &row).unwrap();

        let loaded: Option<Row> = storage.read_row(Table::Agendas, 1).unwrap();
        assert_eq!(loaded, Some(row));

        assert!(storage.remove_row(Table::Agendas, 1).unwrap());
        assert!(!storage.remove_row(Table::Agendas, 1).unwrap());

        let gone: Option<Row> = storage.read_row(Table::Agendas, 1).unwrap();
        assert!(gone.is_none());
    }

    #[test]
    fn test_read_missing_row_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(temp_dir.path()).unwrap();

        let loaded: Option<Row> = storage.read_row(Table::Documents, 99).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_ids_are_monotonic_and_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let storage = Storage::open(temp_dir.path()).unwrap();
            for expected in 1..=3 {
                let id = storage.next_id(Table::Dispositions);
                assert_eq!(id, expected);
                let row = Row {
                    id,
                    label: format!("row {}", id),
                };
                storage.write_row(Table::Dispositions, id, &row).unwrap();
            }
        }

        // A fresh handle must continue after the highest persisted id
        let storage = Storage::open(temp_dir.path()).unwrap();
        assert_eq!(storage.next_id(Table::Dispositions), 4);
        // Counters are independent per table
        assert_eq!(storage.next_id(Table::Agendas), 1);
    }

    #[test]
    fn test_read_all_skips_unreadable_rows() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(temp_dir.path()).unwrap();

        let row = Row {
            id: 1,
            label: "ok".to_string(),
        };
        storage.write_row(Table::Users, 1, &row).unwrap();
        std::fs::write(
            temp_dir.path().join("users").join("user_2.json"),
            "{not json",
        )
        .unwrap();

        let rows: Vec<Row> = storage.read_all(Table::Users).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "ok");
    }

    #[test]
    fn test_page_window() {
        let rows: Vec<i32> = (1..=10).collect();
        assert_eq!(page(rows.clone(), 3, 0), vec![1, 2, 3]);
        assert_eq!(page(rows.clone(), 3, 8), vec![9, 10]);
        assert!(page(rows, 5, 20).is_empty());
    }
}
