//! Offset — durable record of how far into the source we have consumed.
//!
//! A small JSON document at a configured path. Updates are synchronized
//! and written via temp-file-then-rename so a reader never observes a
//! half-written record. Corrupt persisted state is treated as absent
//! state rather than a hard failure: stalling the pipeline forever is
//! worse than re-processing a window of the log.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Persisted resume point: `{ "last_position": u64, "last_file": string }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRecord {
    pub last_position: u64,
    pub last_file: String,
}

#[derive(Debug, Error)]
pub enum OffsetStoreError {
    #[error("offset file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("offset file serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable offset store with interior synchronization: `load` and `update`
/// may be called from different points in a cycle and must never
/// interleave into a torn write.
#[derive(Debug)]
pub struct OffsetStore {
    path: PathBuf,
    record: Mutex<OffsetRecord>,
}

impl OffsetStore {
    /// Open the store at `path`, creating the parent directory and loading
    /// prior state if present. Unparseable state is logged and discarded;
    /// only real I/O failures (other than a missing file) are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, OffsetStoreError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let record = match fs::read(&path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "offset file corrupt, starting fresh");
                    OffsetRecord::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => OffsetRecord::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            record: Mutex::new(record),
        })
    }

    /// Current resume point. Never fails; a fresh store reads as
    /// `{ last_file: "", last_position: 0 }`.
    pub fn load(&self) -> OffsetRecord {
        self.record.lock().expect("offset lock poisoned").clone()
    }

    /// Advance the persisted offset. The in-memory record moves first, so
    /// a persistence failure does not lose progress for the running cycle;
    /// the caller decides whether the error is fatal.
    pub fn update(&self, file: &str, position: u64) -> Result<(), OffsetStoreError> {
        let mut record = self.record.lock().expect("offset lock poisoned");
        record.last_file = file.to_string();
        record.last_position = position;
        let snapshot = record.clone();
        // Persist while holding the lock so writes are strictly ordered.
        persist(&self.path, &snapshot)
    }

    /// Rotation handling: drop the position back to zero for `file`.
    pub fn reset(&self, file: &str) -> Result<(), OffsetStoreError> {
        self.update(file, 0)
    }
}

fn persist(path: &Path, record: &OffsetRecord) -> Result<(), OffsetStoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec(record)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
