use mapty_protocol::MarkerIcon;
use serde::Serialize;

use crate::model::{Metrics, Workout, WorkoutId};

/// One figure shown on a workout's list row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub glyph: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// Display data for one entry of the workout list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRow {
    pub id: WorkoutId,
    pub description: String,
    pub icon: MarkerIcon,
    pub metrics: Vec<Metric>,
}

/// Rows for `workouts`, in the order given.
pub fn rows<'a, I>(workouts: I) -> Vec<WorkoutRow>
where
    I: IntoIterator<Item = &'a Workout>,
{
    workouts.into_iter().map(row).collect()
}

pub fn row(workout: &Workout) -> WorkoutRow {
    let icon = workout.kind().icon();
    let mut metrics = vec![
        metric(icon.glyph(), workout.distance_km(), "km"),
        metric("⏱", workout.duration_min(), "min"),
    ];
    match workout.metrics() {
        Metrics::Run {
            cadence_spm,
            pace_min_per_km,
        } => {
            metrics.push(metric("⚡️", pace_min_per_km, "min/km"));
            metrics.push(metric("🦶🏼", cadence_spm, "spm"));
        }
        Metrics::Ride {
            elevation_gain_m,
            speed_kmh,
        } => {
            metrics.push(metric("⚡️", speed_kmh, "km/h"));
            metrics.push(metric("⛰", elevation_gain_m, "m"));
        }
    }
    WorkoutRow {
        id: workout.id().clone(),
        description: workout.description().to_string(),
        icon,
        metrics,
    }
}

/// Popup text for a workout's map marker, e.g. `🏃 Run on April 14`.
pub fn marker_label(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon().glyph(), workout.description())
}

fn metric(glyph: &'static str, value: f64, unit: &'static str) -> Metric {
    Metric {
        glyph,
        value: format!("{value:.1}"),
        unit,
    }
}
