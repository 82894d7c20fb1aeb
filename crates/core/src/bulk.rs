use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::model::WorkoutId;

/// Fixed-interval pacing driven by the caller's clock. The first tick is
/// due immediately.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Returns true and schedules the following tick if a tick is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.next_due.is_some_and(|due| now < due) {
            return false;
        }
        self.next_due = Some(now.checked_add(self.interval).unwrap_or(now));
        true
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }
}

/// A staggered "delete everything" in progress.
///
/// Holds only the queue of ids and the pacing; the actual removal is an
/// ordinary single delete issued by the session for each id this yields.
/// Dropping the value cancels the rest.
#[derive(Debug, Clone)]
pub struct BulkDeletion {
    queue: VecDeque<WorkoutId>,
    pacer: Pacer,
}

impl BulkDeletion {
    pub fn new(ids: impl IntoIterator<Item = WorkoutId>, interval: Duration) -> Self {
        Self {
            queue: ids.into_iter().collect(),
            pacer: Pacer::new(interval),
        }
    }

    /// The next id to remove if a tick is due, skipping ids for which
    /// `is_live` is false (removed some other way since the bulk started).
    pub fn next_id(&mut self, now: Instant, is_live: impl Fn(&WorkoutId) -> bool) -> Option<WorkoutId> {
        if self.queue.is_empty() || !self.pacer.poll(now) {
            return None;
        }
        while let Some(id) = self.queue.pop_front() {
            if is_live(&id) {
                return Some(id);
            }
        }
        None
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pacer.next_due()
    }
}
