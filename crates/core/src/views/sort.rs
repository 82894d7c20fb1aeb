use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::model::{Workout, WorkoutId};

/// Display order of the workout list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ledger (creation) order.
    #[default]
    Unsorted,
    /// Shortest distance first; ties keep creation order.
    Ascending,
    /// Exact reverse of `Ascending`.
    Descending,
}

impl SortOrder {
    /// The state one "toggle sort" press moves to.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Unsorted => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Unsorted,
        }
    }
}

/// A re-orderable projection of the ledger for display.
///
/// The view never owns workouts and never reorders the ledger. While sorted
/// it holds ids in display order; any ledger mutation must be followed by
/// [`SortView::refresh`], which rebuilds the projection from scratch.
#[derive(Debug, Clone, Default)]
pub struct SortView {
    order: SortOrder,
    ids: Vec<WorkoutId>,
}

impl SortView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Advance Unsorted → Ascending → Descending → Unsorted.
    pub fn toggle(&mut self, ledger: &Ledger) -> SortOrder {
        self.order = self.order.next();
        self.refresh(ledger);
        self.order
    }

    /// Back to ledger order.
    pub fn reset(&mut self) {
        self.order = SortOrder::Unsorted;
        self.ids.clear();
    }

    /// Rebuild the projection from the live ledger.
    pub fn refresh(&mut self, ledger: &Ledger) {
        self.ids.clear();
        if self.order == SortOrder::Unsorted {
            return;
        }
        let mut sorted: Vec<&Workout> = ledger.iter().collect();
        sorted.sort_by(|a, b| a.distance_km().total_cmp(&b.distance_km()));
        if self.order == SortOrder::Descending {
            sorted.reverse();
        }
        self.ids.extend(sorted.into_iter().map(|w| w.id().clone()));
    }

    /// Workouts in display order.
    pub fn project<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Workout> {
        match self.order {
            SortOrder::Unsorted => ledger.iter().collect(),
            SortOrder::Ascending | SortOrder::Descending => {
                self.ids.iter().filter_map(|id| ledger.get(id)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identity;
    use mapty_protocol::Coords;
    use proptest::prelude::*;
    use time::macros::datetime;

    fn run(id: &str, distance: f64) -> Workout {
        let identity = Identity {
            id: WorkoutId::new(id),
            created_at: datetime!(2024-04-14 10:00:00 UTC),
        };
        Workout::run(identity, Coords::new(52.1, 21.0), distance, 50.0, 170.0).unwrap()
    }

    fn ids(workouts: &[&Workout]) -> Vec<String> {
        workouts.iter().map(|w| w.id().to_string()).collect()
    }

    fn ledger_of(distances: &[f64]) -> Ledger {
        Ledger::from_workouts(
            distances
                .iter()
                .enumerate()
                .map(|(i, d)| run(&format!("w{i}"), *d))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn cycles_through_three_states() {
        let ledger = ledger_of(&[5.0, 2.0, 9.0, 2.0]);
        let mut view = SortView::new();
        assert_eq!(ids(&view.project(&ledger)), ["w0", "w1", "w2", "w3"]);

        assert_eq!(view.toggle(&ledger), SortOrder::Ascending);
        assert_eq!(ids(&view.project(&ledger)), ["w1", "w3", "w0", "w2"]);

        assert_eq!(view.toggle(&ledger), SortOrder::Descending);
        assert_eq!(ids(&view.project(&ledger)), ["w2", "w0", "w3", "w1"]);

        assert_eq!(view.toggle(&ledger), SortOrder::Unsorted);
        assert_eq!(ids(&view.project(&ledger)), ["w0", "w1", "w2", "w3"]);
    }

    #[test]
    fn refresh_tracks_ledger_mutations() {
        let mut ledger = ledger_of(&[5.0, 2.0, 9.0]);
        let mut view = SortView::new();
        view.toggle(&ledger);

        ledger.add(run("w9", 1.0)).unwrap();
        ledger.remove(&"w2".into()).unwrap();
        ledger.replace(&"w0".into(), run("w0", 0.5)).unwrap();
        view.refresh(&ledger);

        assert_eq!(ids(&view.project(&ledger)), ["w0", "w9", "w1"]);
    }

    #[test]
    fn sorting_leaves_ledger_order_alone() {
        let ledger = ledger_of(&[5.0, 2.0, 9.0]);
        let mut view = SortView::new();
        view.toggle(&ledger);
        let order: Vec<_> = ledger.iter().map(|w| w.id().to_string()).collect();
        assert_eq!(order, ["w0", "w1", "w2"]);
    }

    proptest! {
        #[test]
        fn ascending_is_ordered_and_descending_is_its_reverse(
            distances in proptest::collection::vec(0.1f64..100.0, 0..30)
        ) {
            let ledger = ledger_of(&distances);
            let mut view = SortView::new();

            view.toggle(&ledger);
            let ascending = ids(&view.project(&ledger));
            let projected = view.project(&ledger);
            for pair in projected.windows(2) {
                prop_assert!(pair[0].distance_km() <= pair[1].distance_km());
            }

            view.toggle(&ledger);
            let mut descending = ids(&view.project(&ledger));
            descending.reverse();
            prop_assert_eq!(descending, ascending);

            view.toggle(&ledger);
            let unsorted = ids(&view.project(&ledger));
            let original: Vec<_> = ledger.iter().map(|w| w.id().to_string()).collect();
            prop_assert_eq!(unsorted, original);
        }
    }
}
