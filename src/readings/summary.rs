//! Grouping readings by parameter and reducing one parameter's readings to the figures
//! shown above the chart.

use crate::types::reading::Reading;
use crate::utils::capitalize;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::Serialize;

/// Used when no reading of the parameter carries a qualifier.
pub const DEFAULT_QUALIFIER: &str = "Standard";
/// Used when no reading of the parameter carries a unit.
pub const DEFAULT_UNIT: &str = "Units unknown";
/// Display format for timestamps in summaries.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// All readings of one parameter, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub parameter: String,
    pub readings: Vec<Reading>,
}

/// Distinct parameters in the order they first appear.
pub fn parameters(readings: &[Reading]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for reading in readings {
        if !seen.contains(&reading.parameter.as_str()) {
            seen.push(reading.parameter.as_str());
        }
    }
    seen
}

/// Splits readings by parameter, groups ordered by first appearance.
pub fn group_by_parameter(readings: &[Reading]) -> Vec<ParameterGroup> {
    parameters(readings)
        .into_iter()
        .map(|parameter| ParameterGroup {
            parameter: parameter.to_string(),
            readings: readings_for_parameter(readings, parameter),
        })
        .collect()
}

/// The parameter to show without asking: only when exactly one is present.
/// With several, the caller has to let the user choose.
pub fn default_parameter(readings: &[Reading]) -> Option<&str> {
    match parameters(readings).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

pub fn readings_for_parameter(readings: &[Reading], parameter: &str) -> Vec<Reading> {
    readings
        .iter()
        .filter(|reading| reading.parameter == parameter)
        .cloned()
        .collect()
}

/// Headline figures for one parameter's readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSummary {
    pub parameter: String,
    /// Number of readings, including those without a value.
    pub count: usize,
    /// Timestamp and value of the most recent reading that has a value.
    pub latest: Option<(DateTime<Utc>, f64)>,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub qualifier: String,
    pub unit: String,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
}

/// Summarises `readings`, which should all belong to `parameter`. Missing values are
/// skipped; `None` when there are no readings at all.
///
/// "Latest" is decided by timestamp, not by position, so the result does not depend on
/// the order the upstream returned.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use flood_monitoring::{summarize, Reading};
///
/// let reading = |hour: u32, value: f64| Reading {
///     station_id: "S1".to_string(),
///     timestamp: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
///     value: Some(value),
///     parameter: "level".to_string(),
///     qualifier: String::new(),
///     unit: "m".to_string(),
///     measure_id: "S1-level".to_string(),
/// };
///
/// let summary = summarize("level", &[reading(0, 1.2), reading(1, 1.8)]).unwrap();
/// assert!((summary.mean.unwrap() - 1.5).abs() < 1e-9);
/// assert_eq!(summary.min, Some(1.2));
/// assert_eq!(summary.max, Some(1.8));
/// assert_eq!(summary.latest.map(|(_, v)| v), Some(1.8));
/// assert_eq!(summary.qualifier, "Standard");
/// ```
pub fn summarize(parameter: &str, readings: &[Reading]) -> Option<ReadingSummary> {
    let first_timestamp = readings.iter().map(|r| r.timestamp).min()?;
    let last_timestamp = readings.iter().map(|r| r.timestamp).max()?;

    let values: Vec<f64> = readings.iter().filter_map(|r| r.value).collect();
    let mean = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    let latest = readings
        .iter()
        .filter_map(|r| r.value.map(|value| (r.timestamp, value)))
        .max_by_key(|(timestamp, _)| *timestamp);

    Some(ReadingSummary {
        parameter: parameter.to_string(),
        count: readings.len(),
        latest,
        mean,
        min: values.iter().copied().min_by_key(|v| OrderedFloat(*v)),
        max: values.iter().copied().max_by_key(|v| OrderedFloat(*v)),
        qualifier: first_non_empty(readings.iter().map(|r| r.qualifier.as_str()))
            .unwrap_or(DEFAULT_QUALIFIER)
            .to_string(),
        unit: first_non_empty(readings.iter().map(|r| r.unit.as_str()))
            .unwrap_or(DEFAULT_UNIT)
            .to_string(),
        first_timestamp,
        last_timestamp,
    })
}

fn first_non_empty<'a>(mut texts: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    texts.find(|text| !text.is_empty())
}

impl ReadingSummary {
    /// y-axis title, e.g. "Level (mASD)".
    pub fn axis_title(&self) -> String {
        format!("{} ({})", capitalize(&self.parameter), self.unit)
    }

    /// Chart title, e.g. "Level - Stage (mASD)".
    pub fn chart_title(&self) -> String {
        format!(
            "{} - {} ({})",
            capitalize(&self.parameter),
            self.qualifier,
            self.unit
        )
    }

    /// A value with two decimals and the unit, as shown in the metric tiles.
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.2} {}", value, self.unit)
    }

    /// "Showing data from {first} to {last}".
    pub fn span_description(&self) -> String {
        format!(
            "Showing data from {} to {}",
            self.first_timestamp.format(DATE_FORMAT),
            self.last_timestamp.format(DATE_FORMAT)
        )
    }
}
