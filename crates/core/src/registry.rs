use crate::error::LedgerError;
use crate::model::WorkoutId;

/// Association between a workout and the marker the map drew for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry<H> {
    pub workout_id: WorkoutId,
    pub handle: H,
}

/// Id-keyed table of map marker handles, one per live workout.
///
/// Handles are opaque: the registry only stores and hands them back so the
/// map surface can dispose of them. Entries stay in attachment order, which
/// tracks ledger order because edits [`rebind`](Self::rebind) in place.
#[derive(Debug, Clone)]
pub struct MarkerRegistry<H> {
    entries: Vec<MarkerEntry<H>>,
}

impl<H> MarkerRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn attach(&mut self, workout_id: WorkoutId, handle: H) -> Result<(), LedgerError> {
        if self.position(&workout_id).is_some() {
            return Err(LedgerError::DuplicateAttachment(workout_id));
        }
        self.entries.push(MarkerEntry { workout_id, handle });
        Ok(())
    }

    /// Remove the entry for `workout_id` and return its handle for disposal.
    pub fn detach(&mut self, workout_id: &WorkoutId) -> Result<H, LedgerError> {
        let index = self
            .position(workout_id)
            .ok_or_else(|| LedgerError::NotFound(workout_id.clone()))?;
        Ok(self.entries.remove(index).handle)
    }

    /// Swap the handle of an existing entry, returning the old one.
    pub fn rebind(&mut self, workout_id: &WorkoutId, handle: H) -> Result<H, LedgerError> {
        let index = self
            .position(workout_id)
            .ok_or_else(|| LedgerError::NotFound(workout_id.clone()))?;
        Ok(std::mem::replace(&mut self.entries[index].handle, handle))
    }

    pub fn detach_all(&mut self) -> Vec<H> {
        self.entries.drain(..).map(|e| e.handle).collect()
    }

    pub fn handle(&self, workout_id: &WorkoutId) -> Option<&H> {
        self.entries
            .iter()
            .find(|e| &e.workout_id == workout_id)
            .map(|e| &e.handle)
    }

    pub fn entries(&self) -> &[MarkerEntry<H>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, workout_id: &WorkoutId) -> Option<usize> {
        self.entries.iter().position(|e| &e.workout_id == workout_id)
    }
}

impl<H> Default for MarkerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
