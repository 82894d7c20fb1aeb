use mapty_protocol::Coords;

use super::id::Identity;
use super::workout::{ValidationError, Workout, WorkoutKind};

/// Raw field values as typed into the workout form.
///
/// Nothing here is trusted: every field is parsed and validated when the
/// form is turned into a [`Workout`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    /// Cadence for a run, elevation gain for a ride.
    pub cadence_or_elevation: String,
}

impl WorkoutForm {
    pub fn new(
        kind: impl Into<String>,
        distance: impl Into<String>,
        duration: impl Into<String>,
        cadence_or_elevation: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            distance: distance.into(),
            duration: duration.into(),
            cadence_or_elevation: cadence_or_elevation.into(),
        }
    }

    pub fn kind(&self) -> Result<WorkoutKind, ValidationError> {
        WorkoutKind::parse(&self.kind)
    }

    pub fn to_workout(&self, identity: Identity, coords: Coords) -> Result<Workout, ValidationError> {
        let distance = parse_number("distance", &self.distance)?;
        let duration = parse_number("duration", &self.duration)?;
        match self.kind()? {
            WorkoutKind::Run => {
                let cadence = parse_number("cadence", &self.cadence_or_elevation)?;
                Workout::run(identity, coords, distance, duration, cadence)
            }
            WorkoutKind::Ride => {
                let elevation = parse_number("elevation gain", &self.cadence_or_elevation)?;
                Workout::ride(identity, coords, distance, duration, elevation)
            }
        }
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })
}
