use mapty_protocol::{Coords, MarkerIcon};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use super::id::{Identity, WorkoutId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("coordinates must be finite")]
    InvalidCoords,
    #[error("unknown workout kind {0:?}")]
    UnknownKind(String),
}

/// Discriminator between the two workout variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Run,
    Ride,
}

impl WorkoutKind {
    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Run => "Run",
            WorkoutKind::Ride => "Ride",
        }
    }

    pub fn icon(self) -> MarkerIcon {
        match self {
            WorkoutKind::Run => MarkerIcon::Running,
            WorkoutKind::Ride => MarkerIcon::Cycling,
        }
    }

    /// Parse a form value. Accepts the variant names as well as the
    /// `running` / `cycling` option values a form select uses.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "run" | "running" => Ok(WorkoutKind::Run),
            "ride" | "cycling" => Ok(WorkoutKind::Ride),
            _ => Err(ValidationError::UnknownKind(raw.to_string())),
        }
    }
}

/// The kind-specific input and its derived metric. Exactly one set exists
/// per workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metrics {
    Run { cadence_spm: f64, pace_min_per_km: f64 },
    Ride { elevation_gain_m: f64, speed_kmh: f64 },
}

/// One logged activity.
///
/// Fields are private: a workout is immutable once built, and an edit is a
/// whole new `Workout` that reuses the old [`Identity`] and coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: OffsetDateTime,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    metrics: Metrics,
    description: String,
}

impl Workout {
    /// Build a run. Pace is `duration / distance` in min/km.
    pub fn run(
        identity: Identity,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, ValidationError> {
        let (distance_km, duration_min) = validate_common(coords, distance_km, duration_min)?;
        let cadence_spm = positive("cadence", cadence_spm)?;
        let metrics = Metrics::Run {
            cadence_spm,
            pace_min_per_km: duration_min / distance_km,
        };
        Ok(Self::assemble(identity, coords, distance_km, duration_min, metrics))
    }

    /// Build a ride. Speed is `distance / (duration / 60)` in km/h.
    pub fn ride(
        identity: Identity,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, ValidationError> {
        let (distance_km, duration_min) = validate_common(coords, distance_km, duration_min)?;
        let elevation_gain_m = non_negative("elevation gain", elevation_gain_m)?;
        let metrics = Metrics::Ride {
            elevation_gain_m,
            speed_kmh: distance_km / (duration_min / 60.0),
        };
        Ok(Self::assemble(identity, coords, distance_km, duration_min, metrics))
    }

    fn assemble(
        identity: Identity,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        metrics: Metrics,
    ) -> Self {
        let kind = match metrics {
            Metrics::Run { .. } => WorkoutKind::Run,
            Metrics::Ride { .. } => WorkoutKind::Ride,
        };
        Self {
            description: describe(kind, identity.created_at),
            id: identity.id,
            created_at: identity.created_at,
            coords,
            distance_km,
            duration_min,
            metrics,
        }
    }

    /// Overwrite the derived metric and description with previously recorded
    /// values. Used when loading, so stored values survive changes to the
    /// computation.
    pub(crate) fn with_recorded(mut self, metric: Option<f64>, description: Option<String>) -> Self {
        if let Some(value) = metric.filter(|v| v.is_finite()) {
            match &mut self.metrics {
                Metrics::Run {
                    pace_min_per_km, ..
                } => *pace_min_per_km = value,
                Metrics::Ride { speed_kmh, .. } => *speed_kmh = value,
            }
        }
        if let Some(description) = description {
            self.description = description;
        }
        self
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// The identity to carry over when this workout is replaced by an edit.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            created_at: self.created_at,
        }
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.metrics {
            Metrics::Run { .. } => WorkoutKind::Run,
            Metrics::Ride { .. } => WorkoutKind::Ride,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Run {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            Metrics::Ride { .. } => None,
        }
    }

    pub fn speed_kmh(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Ride { speed_kmh, .. } => Some(speed_kmh),
            Metrics::Run { .. } => None,
        }
    }
}

/// `"<Kind> on <Month> <Day>"`, e.g. `Run on April 14`.
fn describe(kind: WorkoutKind, created_at: OffsetDateTime) -> String {
    format!(
        "{} on {} {}",
        kind.label(),
        created_at.month(),
        created_at.day()
    )
}

fn validate_common(
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
) -> Result<(f64, f64), ValidationError> {
    if !coords.is_finite() {
        return Err(ValidationError::InvalidCoords);
    }
    Ok((
        positive("distance", distance_km)?,
        positive("duration", duration_min)?,
    ))
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}
