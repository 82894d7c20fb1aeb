//! End-to-end behaviour of a workout session: creation, edits, confirmed
//! and declined deletions, write-through persistence and hydration.

mod common;

use common::{FakeMap, FlakyStore, stored_entries};
use mapty_core::{
    Deletion, DeletionTarget, Identity, KvStore, LedgerConfig, LedgerError, MemoryStore, Workout,
    WorkoutForm, WorkoutId, WorkoutSession,
};
use mapty_protocol::{Coords, MarkerIcon};
use time::macros::datetime;
use tracing_test::traced_test;

fn session() -> WorkoutSession<FakeMap, MemoryStore> {
    WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), MemoryStore::new())
}

fn submit_at<S: KvStore>(
    session: &mut WorkoutSession<FakeMap, S>,
    coords: Coords,
    form: WorkoutForm,
) -> WorkoutId {
    session.select_location(coords);
    session.submit(&form).unwrap().into_value()
}

#[test]
fn run_ride_edit_delete_scenario() {
    let mut session = session();

    let run_id = submit_at(
        &mut session,
        Coords::new(52.1, 21.0),
        WorkoutForm::new("run", "10", "50", "170"),
    );
    let run = session.ledger().find_by_id(&run_id).unwrap().clone();
    assert_eq!(run.pace_min_per_km(), Some(5.0));

    let ride_id = submit_at(
        &mut session,
        Coords::new(52.2, 21.1),
        WorkoutForm::new("ride", "20", "60", "300"),
    );
    assert_eq!(
        session.ledger().find_by_id(&ride_id).unwrap().speed_kmh(),
        Some(20.0)
    );
    assert_ne!(run_id, ride_id);

    let outcome = session
        .edit(&run_id, &WorkoutForm::new("run", "5", "50", "170"))
        .unwrap();
    assert!(outcome.is_persisted());
    assert_eq!(outcome.value.distance_km(), 10.0);

    let edited = session.ledger().find_by_id(&run_id).unwrap();
    assert_eq!(edited.pace_min_per_km(), Some(10.0));
    assert_eq!(edited.id(), run.id());
    assert_eq!(edited.created_at(), run.created_at());
    assert_eq!(edited.coords(), run.coords());
    assert_eq!(session.markers().len(), 2);
    assert_eq!(session.map().live.len(), 2);
    assert_eq!(session.ledger().as_slice()[0].id(), &run_id);

    let pending = session.request_delete(&ride_id).unwrap();
    session.confirmations().answer(true).unwrap();
    let decision = pollster::block_on(pending);
    match session.finish_deletion(decision).unwrap() {
        Deletion::Removed(outcome) => assert_eq!(outcome.value.id(), &ride_id),
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(session.ledger().len(), 1);
    assert!(matches!(
        session.ledger().find_by_id(&ride_id),
        Err(LedgerError::NotFound(_))
    ));
    assert_eq!(session.markers().len(), 1);
    assert!(session.markers().handle(&ride_id).is_none());
    let stored = stored_entries(session.persistence().store());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], run_id.as_str());
    assert_eq!(stored[0]["paceMinPerKm"], 10.0);
}

#[test]
fn declined_delete_changes_nothing() {
    let mut session = session();
    let id = submit_at(
        &mut session,
        Coords::new(52.1, 21.0),
        WorkoutForm::new("run", "10", "50", "170"),
    );

    let ledger_before = session.ledger().clone();
    let markers_before = session.markers().entries().to_vec();
    let blob_before = session.persistence().store().get("workouts").unwrap();

    let pending = session.request_delete(&id).unwrap();
    session.confirmations().answer(false).unwrap();
    let decision = pollster::block_on(pending);
    assert!(matches!(
        session.finish_deletion(decision).unwrap(),
        Deletion::Declined
    ));

    assert_eq!(session.ledger(), &ledger_before);
    assert_eq!(session.markers().entries(), markers_before.as_slice());
    assert_eq!(
        session.persistence().store().get("workouts").unwrap(),
        blob_before
    );
    assert!(session.map().removed.is_empty());
}

#[test]
fn deleting_everything_waits_for_an_answer() {
    let mut session = session();
    submit_at(
        &mut session,
        Coords::new(52.1, 21.0),
        WorkoutForm::new("run", "10", "50", "170"),
    );

    assert!(!session.confirmations().is_pending());
    assert!(matches!(
        session.confirmations().answer(true),
        Err(LedgerError::NoPendingConfirmation)
    ));
    assert_eq!(session.ledger().len(), 1);

    let pending = session.request_delete_all().unwrap();
    assert!(session.confirmations().is_pending());
    assert_eq!(session.ledger().len(), 1);

    assert!(session.confirmations().dismiss());
    let decision = pollster::block_on(pending);
    assert_eq!(decision.target(), &DeletionTarget::All);
    assert!(!decision.is_confirmed());
    assert!(matches!(
        session.finish_deletion(decision).unwrap(),
        Deletion::Declined
    ));
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.markers().len(), 1);
}

#[test]
fn only_one_confirmation_at_a_time() {
    let mut session = session();
    let a = submit_at(
        &mut session,
        Coords::new(1.0, 1.0),
        WorkoutForm::new("run", "1", "5", "150"),
    );
    let b = submit_at(
        &mut session,
        Coords::new(2.0, 2.0),
        WorkoutForm::new("run", "2", "10", "150"),
    );

    let first = session.request_delete(&a).unwrap();
    assert!(matches!(
        session.request_delete(&b),
        Err(LedgerError::ConfirmationBusy)
    ));
    assert!(matches!(
        session.request_delete_all(),
        Err(LedgerError::ConfirmationBusy)
    ));

    session.confirmations().answer(true).unwrap();
    let decision = pollster::block_on(first);
    let _ = session.finish_deletion(decision).unwrap();
    assert_eq!(session.ledger().len(), 1);
    assert!(session.ledger().contains(&b));
}

#[test]
fn markers_are_tracked_by_id_not_position() {
    let mut session = session();
    let here = Coords::new(52.1, 21.0);
    let first = submit_at(&mut session, here, WorkoutForm::new("run", "3", "20", "160"));
    let second = submit_at(&mut session, here, WorkoutForm::new("ride", "15", "40", "50"));

    let second_handle = *session.markers().handle(&second).unwrap();
    let _ = session.remove(&first).unwrap();

    assert_eq!(session.markers().len(), 1);
    assert_eq!(session.markers().handle(&second), Some(&second_handle));
    let drawn = &session.map().live[&second_handle];
    assert_eq!(drawn.icon, MarkerIcon::Cycling);
    assert!(drawn.label.starts_with("🚴 Ride on "));
}

#[test]
fn invalid_form_leaves_state_untouched() {
    let mut session = session();
    assert!(matches!(
        session.submit(&WorkoutForm::new("run", "10", "50", "170")),
        Err(LedgerError::NoLocationSelected)
    ));

    session.select_location(Coords::new(52.1, 21.0));
    for form in [
        WorkoutForm::new("run", "-5", "50", "170"),
        WorkoutForm::new("run", "5", "abc", "170"),
        WorkoutForm::new("ride", "5", "50", "-1"),
        WorkoutForm::new("swim", "5", "50", "1"),
    ] {
        assert!(matches!(
            session.submit(&form),
            Err(LedgerError::Validation(_))
        ));
    }
    assert!(session.ledger().is_empty());
    assert!(session.map().live.is_empty());
    assert!(session.persistence().store().get("workouts").unwrap().is_none());
    assert_eq!(session.selected_location(), Some(Coords::new(52.1, 21.0)));
}

#[test]
fn missing_ids_are_reported() {
    let mut session = session();
    let ghost = WorkoutId::new("0000000000");
    assert!(matches!(session.remove(&ghost), Err(LedgerError::NotFound(_))));
    assert!(matches!(
        session.request_delete(&ghost),
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        session.edit(&ghost, &WorkoutForm::new("run", "1", "1", "1")),
        Err(LedgerError::NotFound(_))
    ));
    assert!(!session.confirmations().is_pending());
}

#[test]
#[traced_test]
fn failed_write_is_a_warning_not_an_error() {
    let store = FlakyStore {
        fail_writes: true,
        ..FlakyStore::default()
    };
    let mut session = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), store);
    session.select_location(Coords::new(52.1, 21.0));
    let outcome = session
        .submit(&WorkoutForm::new("run", "10", "50", "170"))
        .unwrap();

    assert!(!outcome.is_persisted());
    assert!(outcome.warning.is_some());
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.markers().len(), 1);
    assert!(logs_contain("could not persist ledger"));
}

#[test]
#[traced_test]
fn corrupt_blob_boots_empty() {
    let mut store = MemoryStore::new();
    store.set("workouts", b"{ this is not a ledger").unwrap();
    let session = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), store);

    assert!(session.ledger().is_empty());
    assert!(session.markers().is_empty());
    assert!(logs_contain("stored ledger unavailable"));
}

#[test]
fn reload_restores_ledger_markers_and_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let open = || mapty_core::DirStore::open(dir.path()).unwrap();

    let mut first = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), open());
    let run = submit_at(
        &mut first,
        Coords::new(52.1, 21.0),
        WorkoutForm::new("running", "10", "50", "170"),
    );
    let ride = submit_at(
        &mut first,
        Coords::new(52.3, 21.2),
        WorkoutForm::new("cycling", "20", "60", "300"),
    );
    let saved = first.ledger().clone();
    drop(first);

    let mut second = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), open());
    assert_eq!(second.ledger(), &saved);
    assert_eq!(second.markers().len(), 2);
    assert_eq!(second.map().fitted.len(), 1);
    let bounds = second.map().fitted[0];
    assert!(bounds.contains(Coords::new(52.1, 21.0)));
    assert!(bounds.contains(Coords::new(52.3, 21.2)));

    let fresh = submit_at(
        &mut second,
        Coords::new(52.0, 21.0),
        WorkoutForm::new("run", "1", "6", "160"),
    );
    assert_ne!(fresh, run);
    assert_ne!(fresh, ride);

    second.focus(&ride).unwrap();
    assert_eq!(second.map().panned, vec![Coords::new(52.3, 21.2)]);
}

#[test]
fn deleted_ids_are_not_reissued_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let open = || mapty_core::DirStore::open(dir.path()).unwrap();

    let highest = WorkoutId::new("9999999999");
    let mut first = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), open());
    let workout = Workout::run(
        Identity {
            id: highest.clone(),
            created_at: datetime!(2024-04-14 10:00:00 UTC),
        },
        Coords::new(52.1, 21.0),
        10.0,
        50.0,
        170.0,
    )
    .unwrap();
    assert!(first.add(workout).unwrap().is_persisted());
    assert!(first.remove(&highest).unwrap().is_persisted());
    drop(first);

    let mut second = WorkoutSession::boot(LedgerConfig::default(), FakeMap::default(), open());
    assert!(second.ledger().is_empty());
    let fresh = submit_at(
        &mut second,
        Coords::new(52.0, 21.0),
        WorkoutForm::new("run", "1", "6", "160"),
    );
    assert_eq!(fresh.as_str(), "10000000000");
}
