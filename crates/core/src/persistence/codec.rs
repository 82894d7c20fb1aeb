use mapty_protocol::{StoredRide, StoredRun, StoredWorkout};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{CorruptDataError, StoreError};
use crate::model::{Identity, Metrics, Workout, WorkoutId};

pub(super) fn to_stored(workout: &Workout) -> Result<StoredWorkout, StoreError> {
    let created_at_iso = workout
        .created_at()
        .format(&Rfc3339)
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    let id = workout.id().to_string();
    let description = Some(workout.description().to_string());
    Ok(match workout.metrics() {
        Metrics::Run {
            cadence_spm,
            pace_min_per_km,
        } => StoredWorkout::Run(StoredRun {
            id,
            created_at_iso,
            coords: workout.coords(),
            distance_km: workout.distance_km(),
            duration_min: workout.duration_min(),
            cadence_spm,
            pace_min_per_km: Some(pace_min_per_km),
            description,
        }),
        Metrics::Ride {
            elevation_gain_m,
            speed_kmh,
        } => StoredWorkout::Ride(StoredRide {
            id,
            created_at_iso,
            coords: workout.coords(),
            distance_km: workout.distance_km(),
            duration_min: workout.duration_min(),
            elevation_gain_m,
            speed_kmh: Some(speed_kmh),
            description,
        }),
    })
}

pub(super) fn from_stored(index: usize, stored: StoredWorkout) -> Result<Workout, CorruptDataError> {
    let invalid = |source| CorruptDataError::Invalid { index, source };
    match stored {
        StoredWorkout::Run(r) => {
            let identity = identity(index, r.id, &r.created_at_iso)?;
            let run = Workout::run(identity, r.coords, r.distance_km, r.duration_min, r.cadence_spm)
                .map_err(invalid)?;
            Ok(run.with_recorded(r.pace_min_per_km, r.description))
        }
        StoredWorkout::Ride(r) => {
            let identity = identity(index, r.id, &r.created_at_iso)?;
            let ride = Workout::ride(
                identity,
                r.coords,
                r.distance_km,
                r.duration_min,
                r.elevation_gain_m,
            )
            .map_err(invalid)?;
            Ok(ride.with_recorded(r.speed_kmh, r.description))
        }
    }
}

fn identity(index: usize, id: String, created_at_iso: &str) -> Result<Identity, CorruptDataError> {
    let created_at = OffsetDateTime::parse(created_at_iso, &Rfc3339).map_err(|_| {
        CorruptDataError::Timestamp {
            index,
            value: created_at_iso.to_string(),
        }
    })?;
    Ok(Identity {
        id: WorkoutId::new(id),
        created_at,
    })
}
