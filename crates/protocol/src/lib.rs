pub mod icon;
pub mod stored;
pub mod types;

pub use icon::MarkerIcon;
pub use stored::{StoredRide, StoredRun, StoredWorkout};
pub use types::{Bounds, Coords};
