pub mod form;
pub mod id;
pub mod workout;

pub use form::WorkoutForm;
pub use id::{IdGenerator, Identity, WorkoutId};
pub use workout::{Metrics, ValidationError, Workout, WorkoutKind};
