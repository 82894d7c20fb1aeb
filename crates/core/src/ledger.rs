use crate::error::LedgerError;
use crate::model::{Workout, WorkoutId};

/// The authoritative, ordered collection of workouts.
///
/// Order is creation order. Sorting for display never touches it; see
/// [`crate::views::SortView`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    workouts: Vec<Workout>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from workouts in order, rejecting repeated ids.
    pub fn from_workouts(workouts: Vec<Workout>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for workout in workouts {
            ledger.add(workout)?;
        }
        Ok(ledger)
    }

    pub fn add(&mut self, workout: Workout) -> Result<(), LedgerError> {
        if self.position(workout.id()).is_some() {
            return Err(LedgerError::DuplicateId(workout.id().clone()));
        }
        self.workouts.push(workout);
        Ok(())
    }

    pub fn find_by_id(&self, id: &WorkoutId) -> Result<&Workout, LedgerError> {
        self.get(id).ok_or_else(|| LedgerError::NotFound(id.clone()))
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn contains(&self, id: &WorkoutId) -> bool {
        self.position(id).is_some()
    }

    /// Swap the workout stored under `id` for `workout`, keeping its slot.
    /// Returns the workout that was replaced.
    pub fn replace(&mut self, id: &WorkoutId, workout: Workout) -> Result<Workout, LedgerError> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        if workout.id() != id && self.contains(workout.id()) {
            return Err(LedgerError::DuplicateId(workout.id().clone()));
        }
        Ok(std::mem::replace(&mut self.workouts[index], workout))
    }

    pub fn remove(&mut self, id: &WorkoutId) -> Result<Workout, LedgerError> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        Ok(self.workouts.remove(index))
    }

    /// Empty the ledger, returning everything it held in ledger order.
    pub fn remove_all(&mut self) -> Vec<Workout> {
        std::mem::take(&mut self.workouts)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    pub fn as_slice(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
