use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Ids are the last ten decimal digits of the millisecond clock.
const ID_MODULUS: u64 = 10_000_000_000;

/// Stable identifier of a workout, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The identity fields of a workout: never change across edits.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: WorkoutId,
    pub created_at: OffsetDateTime,
}

/// Issues workout ids that are unique within a ledger.
///
/// Ids follow the wall clock but are forced to be strictly increasing.
/// [`IdGenerator::observe`] moves the counter past ids loaded from storage
/// and [`IdGenerator::resume_after`] past the persisted high-water mark, so
/// an id is never handed out twice even if the clock goes backwards, wraps,
/// or the workout that held the highest id was deleted in an earlier run.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue an identity stamped with the current UTC time.
    pub fn issue(&mut self) -> Identity {
        self.issue_at(OffsetDateTime::now_utc())
    }

    pub fn issue_at(&mut self, created_at: OffsetDateTime) -> Identity {
        let millis = u64::try_from(created_at.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        let next = (millis % ID_MODULUS).max(self.last.saturating_add(1));
        self.last = next;
        Identity {
            id: WorkoutId(format!("{next:010}")),
            created_at,
        }
    }

    /// Highest id issued or observed so far, `0` when none.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Continue after a high-water mark persisted by an earlier session.
    pub fn resume_after(&mut self, last: u64) {
        self.last = self.last.max(last);
    }

    /// Record an id that already exists. Non-numeric ids cannot collide with
    /// generated ones and are ignored.
    pub fn observe(&mut self, id: &WorkoutId) {
        if let Ok(n) = id.0.parse::<u64>() {
            self.last = self.last.max(n);
        }
    }
}
