use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "workouts";
pub const DEFAULT_BULK_DELETE_INTERVAL_MS: u64 = 400;

/// Session settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Key the whole ledger blob is stored under.
    pub storage_key: String,
    /// Pause between removals of a bulk delete; 0 removes everything at once.
    pub bulk_delete_interval_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            bulk_delete_interval_ms: DEFAULT_BULK_DELETE_INTERVAL_MS,
        }
    }
}

impl LedgerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn bulk_delete_interval(&self) -> Duration {
        Duration::from_millis(self.bulk_delete_interval_ms)
    }
}
