pub mod list;
pub mod sort;

pub use list::{Metric, WorkoutRow};
pub use sort::{SortOrder, SortView};
