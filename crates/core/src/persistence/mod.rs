//! Write-through persistence of the whole ledger as one JSON blob.
//!
//! The blob is an ordered array of `kind`-tagged objects (see
//! [`mapty_protocol::StoredWorkout`]) kept under a single key of a
//! [`KvStore`]. Loading rebuilds typed [`Workout`]s through the validating
//! constructors, so a blob that decodes but holds nonsense values is
//! reported as corrupt rather than hydrated.
//!
//! Beside the blob, `<key>-last-id` holds the highest workout id ever
//! issued. It survives deletions so ids are not handed out again.

mod codec;
pub mod dir;
pub mod memory;

use mapty_protocol::StoredWorkout;
use thiserror::Error;

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::model::{ValidationError, Workout};

pub use dir::DirStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid key {0:?}")]
    InvalidKey(String),
    #[error("cannot encode ledger: {0}")]
    Encode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CorruptDataError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {index}: invalid timestamp {value:?}")]
    Timestamp { index: usize, value: String },
    #[error("entry {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("id {0} appears more than once")]
    DuplicateId(String),
    #[error("invalid id high-water mark: {0}")]
    LastId(#[source] serde_json::Error),
}

/// Minimal byte-oriented key-value store the ledger persists into.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Serializes the ledger into a [`KvStore`] under a fixed key.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    key: String,
    last_id_key: String,
}

impl<S: KvStore> Persistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            store,
            last_id_key: format!("{key}-last-id"),
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn last_id_key(&self) -> &str {
        &self.last_id_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Encode `workouts` in order, without writing them.
    pub fn encode(workouts: &[Workout]) -> Result<Vec<u8>, StoreError> {
        let stored = workouts
            .iter()
            .map(codec::to_stored)
            .collect::<Result<Vec<StoredWorkout>, StoreError>>()?;
        serde_json::to_vec(&stored).map_err(|e| StoreError::Encode(e.to_string()))
    }

    /// Decode a blob into a ledger.
    pub fn decode(bytes: &[u8]) -> Result<Ledger, CorruptDataError> {
        let stored: Vec<StoredWorkout> = serde_json::from_slice(bytes)?;
        let mut ledger = Ledger::new();
        for (index, entry) in stored.into_iter().enumerate() {
            let workout = codec::from_stored(index, entry)?;
            let id = workout.id().to_string();
            if ledger.add(workout).is_err() {
                return Err(CorruptDataError::DuplicateId(id));
            }
        }
        Ok(ledger)
    }

    pub fn save(&mut self, ledger: &Ledger) -> Result<(), StoreError> {
        let bytes = Self::encode(ledger.as_slice())?;
        self.store.set(&self.key, &bytes)?;
        tracing::debug!(key = %self.key, workouts = ledger.len(), bytes = bytes.len(), "ledger saved");
        Ok(())
    }

    /// Read the ledger back. A missing blob is an empty ledger.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        let Some(bytes) = self.store.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no stored ledger");
            return Ok(Ledger::new());
        };
        let ledger = Self::decode(&bytes)?;
        tracing::debug!(key = %self.key, workouts = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    /// Delete the ledger blob. The id high-water mark is kept.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.delete(&self.key)
    }

    pub fn save_last_id(&mut self, last: u64) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&last).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.set(&self.last_id_key, &bytes)
    }

    /// The persisted id high-water mark, if any was written.
    pub fn load_last_id(&self) -> Result<Option<u64>, LedgerError> {
        let Some(bytes) = self.store.get(&self.last_id_key)? else {
            return Ok(None);
        };
        let last = serde_json::from_slice(&bytes).map_err(CorruptDataError::LastId)?;
        Ok(Some(last))
    }
}
