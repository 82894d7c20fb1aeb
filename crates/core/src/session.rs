use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::Instant;

use mapty_protocol::{Bounds, Coords};

use crate::bulk::BulkDeletion;
use crate::config::LedgerConfig;
use crate::confirm::{Confirmation, ConfirmationGateway};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::map::MapSurface;
use crate::model::{IdGenerator, Workout, WorkoutForm, WorkoutId};
use crate::persistence::{KvStore, Persistence, StoreError};
use crate::registry::MarkerRegistry;
use crate::views::list::{self, WorkoutRow};
use crate::views::{SortOrder, SortView};

/// Result of a mutation that was applied in memory.
///
/// `warning` is set when the write-through to storage failed. The in-memory
/// ledger stays authoritative for the rest of the session either way.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<StoreError>,
}

impl<T> Outcome<T> {
    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// What a confirmed deletion applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionTarget {
    One(WorkoutId),
    All,
}

/// A deletion waiting on the user's answer.
///
/// Resolves to a [`Decision`] to pass back to
/// [`WorkoutSession::finish_deletion`]. Nothing is touched until then.
#[must_use = "a pending deletion does nothing unless awaited and finished"]
#[derive(Debug)]
pub struct PendingDeletion {
    target: DeletionTarget,
    confirmation: Confirmation,
}

impl Future for PendingDeletion {
    type Output = Decision;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Decision> {
        let confirmed = ready!(Pin::new(&mut self.confirmation).poll(cx));
        Poll::Ready(Decision {
            target: self.target.clone(),
            confirmed,
        })
    }
}

/// The user's answer to a deletion request.
///
/// Only a resolved [`PendingDeletion`] produces one, so nothing can be
/// deleted through [`WorkoutSession::finish_deletion`] without a
/// confirmation having been opened and answered:
///
/// ```compile_fail
/// use mapty_core::{Decision, DeletionTarget};
///
/// let _ = Decision { target: DeletionTarget::All, confirmed: true };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    target: DeletionTarget,
    confirmed: bool,
}

impl Decision {
    pub fn target(&self) -> &DeletionTarget {
        &self.target
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

/// What [`WorkoutSession::finish_deletion`] did.
#[derive(Debug)]
pub enum Deletion {
    /// The user said no; nothing changed.
    Declined,
    Removed(Outcome<Workout>),
    /// Everything was removed at once (no stagger configured).
    RemovedAll(Outcome<Vec<Workout>>),
    /// A staggered bulk deletion was queued; drive it with
    /// [`WorkoutSession::tick_bulk_delete`].
    BulkStarted { queued: usize },
}

/// The workout ledger together with everything kept in step with it.
///
/// Every mutation runs in the same order: ledger, then marker registry and
/// map, then sort view, then write-through to storage. Storage failures do
/// not undo the in-memory change; they come back as [`Outcome::warning`]
/// and are logged.
pub struct WorkoutSession<M: MapSurface, S: KvStore> {
    config: LedgerConfig,
    map: M,
    ledger: Ledger,
    markers: MarkerRegistry<M::Handle>,
    persistence: Persistence<S>,
    sort: SortView,
    confirmations: ConfirmationGateway,
    ids: IdGenerator,
    selected: Option<Coords>,
    bulk: Option<BulkDeletion>,
}

impl<M: MapSurface, S: KvStore> WorkoutSession<M, S> {
    /// Load the stored ledger and draw it.
    ///
    /// An unreadable blob is not fatal: the session starts empty and the
    /// problem is logged. The blob is left in place until the next save.
    pub fn boot(config: LedgerConfig, map: M, store: S) -> Self {
        let persistence = Persistence::new(store, config.storage_key.clone());
        let ledger = match persistence.load() {
            Ok(ledger) => ledger,
            Err(error) => {
                tracing::warn!(%error, key = persistence.key(), "stored ledger unavailable, starting empty");
                Ledger::new()
            }
        };
        let mut ids = IdGenerator::new();
        match persistence.load_last_id() {
            Ok(Some(last)) => ids.resume_after(last),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, key = persistence.last_id_key(), "id high-water mark unavailable");
            }
        }

        let mut session = Self {
            config,
            map,
            ledger: Ledger::new(),
            markers: MarkerRegistry::new(),
            persistence,
            sort: SortView::new(),
            confirmations: ConfirmationGateway::new(),
            ids,
            selected: None,
            bulk: None,
        };
        session.hydrate(ledger);
        session
    }

    fn hydrate(&mut self, ledger: Ledger) {
        for workout in &ledger {
            self.ids.observe(workout.id());
            let handle = draw(&mut self.map, workout);
            if let Err(error) = self.markers.attach(workout.id().clone(), handle) {
                tracing::warn!(%error, "marker registry out of step during hydration");
            }
        }
        self.ledger = ledger;
        self.sort.reset();
        self.fit_all();
        tracing::info!(workouts = self.ledger.len(), "ledger hydrated");
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn markers(&self) -> &MarkerRegistry<M::Handle> {
        &self.markers
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// The gateway the UI reads the open question from and answers.
    pub fn confirmations(&mut self) -> &mut ConfirmationGateway {
        &mut self.confirmations
    }

    /// Remember where the user clicked; the next [`submit`](Self::submit)
    /// places the workout there.
    pub fn select_location(&mut self, coords: Coords) {
        self.selected = Some(coords);
    }

    pub fn selected_location(&self) -> Option<Coords> {
        self.selected
    }

    /// Create a workout from the form at the selected location.
    pub fn submit(&mut self, form: &WorkoutForm) -> Result<Outcome<WorkoutId>, LedgerError> {
        let coords = self.selected.ok_or(LedgerError::NoLocationSelected)?;
        let workout = form.to_workout(self.ids.issue(), coords)?;
        let outcome = self.add(workout)?;
        self.selected = None;
        Ok(outcome)
    }

    /// Add an already built workout.
    pub fn add(&mut self, workout: Workout) -> Result<Outcome<WorkoutId>, LedgerError> {
        let id = workout.id().clone();
        if self.markers.handle(&id).is_some() {
            return Err(LedgerError::DuplicateAttachment(id));
        }
        self.ledger.add(workout)?;
        let handle = draw(&mut self.map, self.ledger.find_by_id(&id)?);
        self.markers.attach(id.clone(), handle)?;
        self.ids.observe(&id);
        self.sort.refresh(&self.ledger);
        tracing::debug!(id = %id, "workout added");
        Ok(self.persist(id))
    }

    /// Replace a workout with one built from `form`.
    ///
    /// The replacement keeps the id, creation time and coordinates and takes
    /// the old one's place in the ledger. Its marker is redrawn because the
    /// icon and label may have changed. Returns the replaced workout.
    pub fn edit(&mut self, id: &WorkoutId, form: &WorkoutForm) -> Result<Outcome<Workout>, LedgerError> {
        let current = self.ledger.find_by_id(id)?;
        if self.markers.handle(id).is_none() {
            return Err(LedgerError::NotFound(id.clone()));
        }
        let replacement = form.to_workout(current.identity(), current.coords())?;
        let previous = self.ledger.replace(id, replacement)?;
        let handle = draw(&mut self.map, self.ledger.find_by_id(id)?);
        let stale = self.markers.rebind(id, handle)?;
        self.map.remove_marker(stale);
        self.sort.refresh(&self.ledger);
        tracing::debug!(id = %id, "workout edited");
        Ok(self.persist(previous))
    }

    /// Ask before deleting one workout.
    pub fn request_delete(&mut self, id: &WorkoutId) -> Result<PendingDeletion, LedgerError> {
        let workout = self.ledger.find_by_id(id)?;
        let confirmation = self
            .confirmations
            .confirm(format!("Delete \"{}\"?", workout.description()))?;
        Ok(PendingDeletion {
            target: DeletionTarget::One(id.clone()),
            confirmation,
        })
    }

    /// Ask before deleting every workout.
    pub fn request_delete_all(&mut self) -> Result<PendingDeletion, LedgerError> {
        let confirmation = self
            .confirmations
            .confirm(format!("Delete all {} workouts?", self.ledger.len()))?;
        Ok(PendingDeletion {
            target: DeletionTarget::All,
            confirmation,
        })
    }

    /// Apply the user's answer to a deletion request.
    pub fn finish_deletion(&mut self, decision: Decision) -> Result<Deletion, LedgerError> {
        if !decision.confirmed {
            tracing::debug!(deletion = ?decision.target, "deletion declined");
            return Ok(Deletion::Declined);
        }
        match decision.target {
            DeletionTarget::One(id) => Ok(Deletion::Removed(self.remove(&id)?)),
            DeletionTarget::All if self.config.bulk_delete_interval_ms == 0 => {
                self.cancel_bulk_delete();
                Ok(Deletion::RemovedAll(self.remove_all()))
            }
            DeletionTarget::All => Ok(Deletion::BulkStarted {
                queued: self.start_bulk_delete(),
            }),
        }
    }

    /// Remove a workout and its marker without asking.
    pub fn remove(&mut self, id: &WorkoutId) -> Result<Outcome<Workout>, LedgerError> {
        self.ledger.find_by_id(id)?;
        if self.markers.handle(id).is_none() {
            return Err(LedgerError::NotFound(id.clone()));
        }
        let removed = self.ledger.remove(id)?;
        let handle = self.markers.detach(id)?;
        self.map.remove_marker(handle);
        self.sort.refresh(&self.ledger);
        tracing::debug!(id = %id, "workout removed");
        Ok(self.persist(removed))
    }

    /// Remove everything at once and delete the stored blob.
    pub fn remove_all(&mut self) -> Outcome<Vec<Workout>> {
        let removed = self.ledger.remove_all();
        for handle in self.markers.detach_all() {
            self.map.remove_marker(handle);
        }
        self.sort.refresh(&self.ledger);
        tracing::debug!(count = removed.len(), "all workouts removed");
        let warning = match self.persistence.clear() {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(%error, "could not clear stored ledger, keeping in-memory state");
                Some(error)
            }
        };
        Outcome {
            value: removed,
            warning,
        }
    }

    /// Queue every current workout for staggered removal, replacing any
    /// bulk deletion already running. Returns how many were queued.
    pub fn start_bulk_delete(&mut self) -> usize {
        if self.cancel_bulk_delete() {
            tracing::info!("previous bulk deletion superseded");
        }
        let ids: Vec<WorkoutId> = self.ledger.iter().map(|w| w.id().clone()).collect();
        let queued = ids.len();
        self.bulk = Some(BulkDeletion::new(ids, self.config.bulk_delete_interval()));
        tracing::debug!(queued, "bulk deletion started");
        queued
    }

    /// Stop a running bulk deletion. Returns whether one was running.
    pub fn cancel_bulk_delete(&mut self) -> bool {
        self.bulk.take().is_some()
    }

    pub fn bulk_delete_remaining(&self) -> Option<usize> {
        self.bulk.as_ref().map(BulkDeletion::remaining)
    }

    /// When the running bulk deletion next wants a tick.
    pub fn bulk_delete_due(&self) -> Option<Instant> {
        self.bulk.as_ref().and_then(BulkDeletion::next_due)
    }

    /// Advance a running bulk deletion: removes at most one workout if a
    /// tick is due at `now`.
    pub fn tick_bulk_delete(&mut self, now: Instant) -> Result<Option<Outcome<Workout>>, LedgerError> {
        let Some(bulk) = self.bulk.as_mut() else {
            return Ok(None);
        };
        let ledger = &self.ledger;
        let next = bulk.next_id(now, |id| ledger.contains(id));
        let removed = match next {
            Some(id) => Some(self.remove(&id)?),
            None => None,
        };
        if self.bulk.as_ref().is_some_and(BulkDeletion::is_finished) {
            self.bulk = None;
            tracing::debug!("bulk deletion finished");
        }
        Ok(removed)
    }

    /// Advance the display order: unsorted → ascending → descending.
    pub fn toggle_sort(&mut self) -> SortOrder {
        self.sort.toggle(&self.ledger)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort.order()
    }

    /// Workouts in display order.
    pub fn view(&self) -> Vec<&Workout> {
        self.sort.project(&self.ledger)
    }

    pub fn rows(&self) -> Vec<WorkoutRow> {
        list::rows(self.view())
    }

    /// Pan the map to a workout.
    pub fn focus(&mut self, id: &WorkoutId) -> Result<(), LedgerError> {
        let coords = self.ledger.find_by_id(id)?.coords();
        self.map.pan_to(coords);
        Ok(())
    }

    /// Fit the map around every workout. Returns false when there are none.
    pub fn fit_all(&mut self) -> bool {
        match Bounds::enclosing(self.ledger.iter().map(Workout::coords)) {
            Some(bounds) => {
                self.map.fit_bounds(bounds);
                true
            }
            None => false,
        }
    }

    fn persist<T>(&mut self, value: T) -> Outcome<T> {
        let saved = self
            .persistence
            .save(&self.ledger)
            .and_then(|()| self.persistence.save_last_id(self.ids.last()));
        let warning = match saved {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(%error, "could not persist ledger, keeping in-memory state");
                Some(error)
            }
        };
        Outcome { value, warning }
    }
}

fn draw<M: MapSurface>(map: &mut M, workout: &Workout) -> M::Handle {
    map.create_marker(
        workout.coords(),
        workout.kind().icon(),
        &list::marker_label(workout),
    )
}
