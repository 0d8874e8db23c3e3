//! Defines the normalised monitoring-station record and the geographic point type used
//! by the proximity filters.

use serde::{Deserialize, Serialize};

/// Station status reported by the Environment Agency for a working gauge.
pub const STATUS_ACTIVE: &str = "Active";
/// Placeholder used when the upstream omits a river name or status.
pub const UNKNOWN: &str = "Unknown";

/// A geographical coordinate: latitude first, longitude second, both in decimal degrees.
///
/// # Examples
///
/// ```
/// use flood_monitoring::LatLon;
///
/// let kingston = LatLon(51.4103, -0.3076);
/// assert_eq!(kingston.0, 51.4103);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// One flood-monitoring station, as listed by `GET /id/stations`.
///
/// Built fresh on every catalog fetch and never mutated afterwards. `id` and `label`
/// are always present; records missing either are dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The upstream `stationReference`, e.g. "3400TH".
    pub id: String,
    /// Display name, e.g. "Kingston".
    pub label: String,
    /// River name, or "Unknown" when not supplied.
    pub river: String,
    pub town: Option<String>,
    pub catchment: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Status with any URI prefix stripped ("Active", "Closed", "Suspended", ...),
    /// or "Unknown" when not supplied.
    pub status: String,
    /// Number of measures the station advertises.
    pub measure_count: usize,
}

impl Station {
    /// Both coordinates, when the station has them.
    pub fn location(&self) -> Option<LatLon> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
            _ => None,
        }
    }

    /// Link to the station's position on Google Maps.
    pub fn map_url(&self) -> Option<String> {
        self.location().map(|LatLon(lat, lon)| {
            format!("https://www.google.com/maps/search/?api=1&query={},{}", lat, lon)
        })
    }

    /// "label (id)", the text shown in the station picker.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.label, self.id)
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn has_known_river(&self) -> bool {
        !self.river.is_empty() && self.river != UNKNOWN
    }
}
