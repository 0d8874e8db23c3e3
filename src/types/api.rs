//! Serde structures for the flood-monitoring JSON feed.
//!
//! The feed is loosely typed: fields can be missing, and some station fields arrive
//! as a list when the station has several values on record. Those fields are kept as
//! raw [`Value`]s and read through the helpers below.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

/// Envelope shared by every list endpoint: `{ "items": [...] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStation {
    #[serde(rename = "stationReference")]
    pub station_reference: Option<Value>,
    pub label: Option<Value>,
    #[serde(rename = "riverName")]
    pub river_name: Option<Value>,
    pub town: Option<Value>,
    #[serde(rename = "catchmentName")]
    pub catchment_name: Option<Value>,
    pub lat: Option<Value>,
    pub long: Option<Value>,
    pub status: Option<Value>,
    pub measures: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawReading {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub value: Option<Value>,
    pub measure: Option<RawMeasureRef>,
}

/// The `measure` of a reading is either expanded inline or given as a bare URI.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawMeasureRef {
    Uri(String),
    Detailed(RawMeasure),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeasure {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    pub parameter: Option<String>,
    pub qualifier: Option<String>,
    #[serde(rename = "unitName")]
    pub unit_name: Option<String>,
}

/// A string, or the first string of a list.
pub(crate) fn first_text(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(text) => Some(text.as_str()),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }
}

/// A number, or the first number of a list.
pub(crate) fn first_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::Array(items) => items.iter().find_map(Value::as_f64),
        _ => None,
    }
}

/// How many entries a `measures` field holds: a list counts its elements, a single
/// object counts as one.
pub(crate) fn entry_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(_)) => 1,
        _ => 0,
    }
}
