use serde::{Deserialize, Serialize};

use crate::types::Coords;

/// One persisted workout, discriminated by `kind`.
///
/// Derived fields (`paceMinPerKm`, `speedKmh`, `description`) are written
/// verbatim. They are optional on read so blobs written before a field
/// existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoredWorkout {
    Run(StoredRun),
    Ride(StoredRide),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRun {
    pub id: String,
    #[serde(rename = "createdAtISO")]
    pub created_at_iso: String,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRide {
    pub id: String,
    #[serde(rename = "createdAtISO")]
    pub created_at_iso: String,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub elevation_gain_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
