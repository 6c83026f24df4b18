//! Flat-file YAML backend.
//!
//! The file holds a map of collector ID to record. The whole document is
//! rewritten on every mutation, so the store keeps an in-memory mirror to
//! avoid read-modify-write round trips through the parser.
//!
//! This backend never writes the pending map; restarting always forfeits
//! unsold resources.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use collector_types::Collector;

use crate::error::StorageError;
use crate::record::CollectorRecord;

/// Flat-file YAML store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: BTreeMap<Uuid, CollectorRecord>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// document when the file does not exist yet.
    ///
    /// Records that fail to decode are skipped with a warning; a corrupt
    /// file never prevents the backend from opening.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectFailed`] if the file cannot be read
    /// or created.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(StorageError::connect)?;
        }

        let records = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(StorageError::connect)?;
            Self::parse_document(&contents)
        } else {
            std::fs::write(path, "").map_err(StorageError::connect)?;
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), count = records.len(), "File store opened");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Decode a YAML document map, skipping entries that fail to decode.
    fn parse_document(contents: &str) -> BTreeMap<Uuid, CollectorRecord> {
        if contents.trim().is_empty() {
            return BTreeMap::new();
        }

        let raw: BTreeMap<String, serde_yml::Value> = match serde_yml::from_str(contents) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(error = %err, "Collector file is not a valid YAML map, starting empty");
                return BTreeMap::new();
            }
        };

        let mut records = BTreeMap::new();
        for (key, value) in raw {
            match serde_yml::from_value::<CollectorRecord>(value) {
                Ok(record) => {
                    records.insert(record.id, record);
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Skipping corrupt collector record");
                }
            }
        }
        records
    }

    /// Rewrite the backing file from the in-memory mirror.
    fn flush(&self) -> Result<(), StorageError> {
        let document: BTreeMap<String, CollectorRecord> = self
            .records
            .values()
            .map(|r| (r.id.to_string(), r.clone().without_pending()))
            .collect();
        let yaml = serde_yml::to_string(&document).map_err(StorageError::write)?;
        std::fs::write(&self.path, yaml).map_err(StorageError::write)
    }

    /// Replace the entire document with the given collectors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if the file cannot be written.
    pub fn save_all(&mut self, collectors: &[Collector]) -> Result<(), StorageError> {
        self.records = collectors
            .iter()
            .map(|c| {
                (
                    c.id.into_inner(),
                    CollectorRecord::from_collector(c).without_pending(),
                )
            })
            .collect();
        self.flush()?;
        tracing::debug!(count = self.records.len(), "File store saved all collectors");
        Ok(())
    }

    /// Return all stored collectors.
    pub fn load_all(&self) -> Vec<Collector> {
        self.records
            .values()
            .cloned()
            .map(CollectorRecord::into_collector)
            .collect()
    }

    /// Upsert one collector.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if the file cannot be written.
    pub fn save_one(&mut self, collector: &Collector) -> Result<(), StorageError> {
        self.records.insert(
            collector.id.into_inner(),
            CollectorRecord::from_collector(collector).without_pending(),
        );
        self.flush()
    }

    /// Delete one collector. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if the file cannot be written.
    pub fn delete_one(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let removed = self.records.remove(&id).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    /// Flush and release. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] if the final flush fails.
    pub fn shutdown(&mut self) -> Result<(), StorageError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use collector_types::{OwnerId, Position, ResourceKind};

    use super::*;

    fn make_collector(name: &str, x: f64) -> Collector {
        let mut c = Collector::new(
            OwnerId::new(),
            name.to_owned(),
            Position::new("overworld".to_owned(), x, 64.0, 0.0),
            1_700_000_000,
        );
        c.time_remaining = 600;
        c.record_collection(ResourceKind::Wheat, 7);
        c
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            return;
        };
        let path = dir.path().join("collectors.yml");

        let a = make_collector("steve", 0.0);
        let b = make_collector("alex", 100.0);
        {
            let mut store = match FileStore::open(&path) {
                Ok(s) => s,
                Err(_) => return,
            };
            assert!(store.save_all(&[a.clone(), b.clone()]).is_ok());
        }

        let reopened = FileStore::open(&path).ok();
        assert!(reopened.is_some());
        let loaded = reopened.map(|s| s.load_all()).unwrap_or_default();
        assert_eq!(loaded.len(), 2);

        // Pending is never persisted by this backend.
        assert!(loaded.iter().all(|c| c.pending.is_empty()));
        assert!(loaded.iter().any(|c| c.id == a.id));
    }

    #[test]
    fn corrupt_entries_are_skipped() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            return;
        };
        let path = dir.path().join("collectors.yml");

        let good = make_collector("steve", 0.0);
        {
            let mut store = match FileStore::open(&path) {
                Ok(s) => s,
                Err(_) => return,
            };
            assert!(store.save_one(&good).is_ok());
        }

        // Splice an undecodable entry into the otherwise valid document.
        let mut contents = std::fs::read_to_string(&path).unwrap_or_default();
        contents.push_str("bad-entry: [not, a, record]\n");
        assert!(std::fs::write(&path, contents).is_ok());

        let store = FileStore::open(&path).ok();
        let loaded = store.map(|s| s.load_all()).unwrap_or_default();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.first().map(|c| c.id), Some(good.id));
    }

    #[test]
    fn delete_one_reports_presence() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            return;
        };
        let path = dir.path().join("collectors.yml");

        let c = make_collector("steve", 0.0);
        let mut store = match FileStore::open(&path) {
            Ok(s) => s,
            Err(_) => return,
        };
        assert!(store.save_one(&c).is_ok());
        assert_eq!(store.delete_one(c.id.into_inner()).ok(), Some(true));
        assert_eq!(store.delete_one(c.id.into_inner()).ok(), Some(false));
    }
}
