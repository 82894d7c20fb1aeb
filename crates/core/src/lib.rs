//! Workout ledger for mapty.
//!
//! The ledger is the authoritative, creation-ordered list of workouts. A
//! [`WorkoutSession`] keeps three things in step with it: one map marker per
//! workout ([`MarkerRegistry`]), a write-through JSON blob in a [`KvStore`]
//! ([`Persistence`]), and a re-orderable display projection ([`SortView`]).
//! Destructive operations go through a single-slot [`ConfirmationGateway`].

pub mod bulk;
pub mod config;
pub mod confirm;
pub mod error;
pub mod ledger;
pub mod map;
pub mod model;
pub mod persistence;
pub mod registry;
pub mod session;
pub mod views;

pub use config::LedgerConfig;
pub use confirm::{Confirmation, ConfirmationGateway};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use map::MapSurface;
pub use model::{IdGenerator, Identity, Metrics, ValidationError, Workout, WorkoutForm, WorkoutId, WorkoutKind};
pub use persistence::{CorruptDataError, DirStore, KvStore, MemoryStore, Persistence, StoreError};
pub use registry::{MarkerEntry, MarkerRegistry};
pub use session::{Decision, Deletion, DeletionTarget, Outcome, PendingDeletion, WorkoutSession};
pub use views::{SortOrder, SortView, WorkoutRow};
