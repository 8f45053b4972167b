//! File-backed team memory carried from one match to the next.
//!
//! The file is a single JSON document:
//! ```text
//! {
//!   "schema_version": 1,
//!   "sha256": "<hex digest of the serialized payload>",
//!   "payload": { "length": 32, "matches": 3, "teams": [[...], [...]] }
//! }
//! ```

use arbor_common::Team;
use arbor_kernel::TeamMemoryBank;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: u32 = 1;

/// Errors from loading or saving team memory.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("team memory length mismatch: file has {found}, expected {expected}")]
    LengthMismatch { found: usize, expected: usize },
}

/// Both teams' memory at the end of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPayload {
    pub length: usize,
    /// Matches played so far in the series.
    pub matches: u32,
    /// Team A then team B.
    pub teams: [Vec<i64>; 2],
}

impl MemoryPayload {
    /// Capture the memory a match wrote.
    pub fn capture(bank: &TeamMemoryBank, matches: u32) -> Self {
        Self {
            length: bank.len(),
            matches,
            teams: [
                bank.current(Team::A).to_vec(),
                bank.current(Team::B).to_vec(),
            ],
        }
    }

    pub fn team(&self, team: Team) -> &[i64] {
        match team {
            Team::A => &self.teams[0],
            Team::B => &self.teams[1],
            Team::Neutral => &[],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    schema_version: u32,
    sha256: String,
    payload: MemoryPayload,
}

/// Team memory file with schema versioning and integrity checking.
#[derive(Debug, Clone)]
pub struct TeamMemoryStore {
    path: PathBuf,
}

impl TeamMemoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a previous match has left memory behind.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `payload`, replacing any earlier file.
    pub fn save(&self, payload: &MemoryPayload) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            sha256: sha256_hex(&serde_json::to_vec(payload)?),
            payload: payload.clone(),
        };
        serde_json::to_writer_pretty(std::fs::File::create(&self.path)?, &envelope)?;
        tracing::debug!(
            path = %self.path.display(),
            matches = payload.matches,
            "team memory saved"
        );
        Ok(())
    }

    /// Read and verify the stored memory, requiring `expected_length` cells
    /// per team.
    pub fn load(&self, expected_length: usize) -> Result<MemoryPayload, StoreError> {
        let envelope: Envelope = serde_json::from_reader(std::fs::File::open(&self.path)?)?;
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: envelope.schema_version,
                expected_version: SCHEMA_VERSION,
            });
        }
        let actual = sha256_hex(&serde_json::to_vec(&envelope.payload)?);
        if actual != envelope.sha256 {
            return Err(StoreError::IntegrityMismatch {
                expected: envelope.sha256,
                actual,
            });
        }
        let payload = envelope.payload;
        for found in [payload.length, payload.teams[0].len(), payload.teams[1].len()] {
            if found != expected_length {
                return Err(StoreError::LengthMismatch {
                    found,
                    expected: expected_length,
                });
            }
        }
        Ok(payload)
    }

    /// Load if present; a missing file means a fresh series.
    pub fn load_or_empty(&self, expected_length: usize) -> Result<MemoryPayload, StoreError> {
        if !self.exists() {
            return Ok(MemoryPayload {
                length: expected_length,
                matches: 0,
                teams: [vec![0; expected_length], vec![0; expected_length]],
            });
        }
        self.load(expected_length)
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> TeamMemoryBank {
        let mut bank = TeamMemoryBank::new(4);
        bank.set(Team::A, 0, 11);
        bank.set(Team::B, 3, -7);
        bank
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TeamMemoryStore::new(tmp.path().join("series").join("memory.json"));
        assert!(!store.exists());
        store.save(&MemoryPayload::capture(&bank(), 1)).unwrap();
        assert!(store.exists());

        let loaded = store.load(4).unwrap();
        assert_eq!(loaded.matches, 1);
        assert_eq!(loaded.team(Team::A), &[11, 0, 0, 0]);
        assert_eq!(loaded.team(Team::B), &[0, 0, 0, -7]);
        assert!(loaded.team(Team::Neutral).is_empty());
    }

    #[test]
    fn missing_file_is_a_fresh_series() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TeamMemoryStore::new(tmp.path().join("memory.json"));
        let fresh = store.load_or_empty(3).unwrap();
        assert_eq!(fresh.matches, 0);
        assert_eq!(fresh.teams, [vec![0; 3], vec![0; 3]]);
        assert!(matches!(store.load(3), Err(StoreError::Io(_))));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TeamMemoryStore::new(tmp.path().join("memory.json"));
        store.save(&MemoryPayload::capture(&bank(), 1)).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        doc["payload"]["teams"][0][0] = serde_json::json!(12);
        std::fs::write(store.path(), serde_json::to_string(&doc).unwrap()).unwrap();

        assert!(matches!(
            store.load(4),
            Err(StoreError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn schema_version_is_checked() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TeamMemoryStore::new(tmp.path().join("memory.json"));
        store.save(&MemoryPayload::capture(&bank(), 1)).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        doc["schema_version"] = serde_json::json!(9);
        std::fs::write(store.path(), serde_json::to_string(&doc).unwrap()).unwrap();

        assert!(matches!(
            store.load(4),
            Err(StoreError::SchemaMismatch {
                file_version: 9,
                expected_version: 1
            })
        ));
    }

    #[test]
    fn length_must_match_the_match_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TeamMemoryStore::new(tmp.path().join("memory.json"));
        store.save(&MemoryPayload::capture(&bank(), 2)).unwrap();
        assert!(matches!(
            store.load(32),
            Err(StoreError::LengthMismatch {
                found: 4,
                expected: 32
            })
        ));
    }
}
