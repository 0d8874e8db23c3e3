//! Results shaped for a dashboard: a failed fetch becomes an empty list plus a notice the
//! user can read, instead of an error to propagate.

use crate::error::FloodMonitoringError;
use crate::utils::describe_error;
use std::sync::Arc;

pub const NO_MATCHING_STATIONS: &str =
    "No stations match your filters. Please adjust your search criteria.";
pub const NO_RECENT_READINGS: &str = "No readings available for this station in the last 24 hours.";
pub const STATIONS_UNAVAILABLE: &str = "Failed to load stations data. Please try again later.";

/// Shown when a station has readings, but none for the selected parameter.
pub fn no_parameter_readings(parameter: &str) -> String {
    format!(
        "No {} readings available for this station in the last 24 hours.",
        parameter
    )
}

/// Items from a fetch that is allowed to fail. On failure `items` is empty and `error`
/// holds the cause.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub items: Arc<Vec<T>>,
    pub error: Option<FloodMonitoringError>,
    subject: &'static str,
}

impl<T> FetchOutcome<T> {
    pub(crate) fn from_result(
        subject: &'static str,
        result: Result<Arc<Vec<T>>, FloodMonitoringError>,
    ) -> Self {
        match result {
            Ok(items) => Self {
                items,
                error: None,
                subject,
            },
            Err(error) => Self {
                items: Arc::new(Vec::new()),
                error: Some(error),
                subject,
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// "Error fetching {stations|readings}: {cause}" when the fetch failed.
    pub fn notice(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|error| format!("Error fetching {}: {}", self.subject, describe_error(error)))
    }

    pub fn into_result(self) -> Result<Arc<Vec<T>>, FloodMonitoringError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.items),
        }
    }
}
