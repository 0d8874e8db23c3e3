use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped value for one measure at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// The station the readings were requested for.
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    /// Missing or non-numeric upstream values become `None`.
    pub value: Option<f64>,
    /// What is measured, e.g. "level" or "flow"; "Unknown" when not supplied.
    pub parameter: String,
    /// e.g. "Stage", "Downstream Stage"; may be empty.
    pub qualifier: String,
    /// Upstream `unitName`, e.g. "mASD" or "m3/s"; may be empty.
    pub unit: String,
    /// Final path segment of the measure's `@id`.
    pub measure_id: String,
}
