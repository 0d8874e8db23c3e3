//! Representative flood-monitoring API payloads, trimmed to the fields the crate reads.
//!
//! Shapes follow live responses from
//! `https://environment.data.gov.uk/flood-monitoring/id/stations` and
//! `.../id/stations/{id}/readings`, including the irregular records the feed contains
//! (list-valued fields, missing labels, bare measure URIs).

/// Five station records. Two must be dropped: one lacks a label, one lacks a
/// `stationReference`. "Lea" and "Kingston" arrive out of label order.
pub const STATIONS_JSON: &str = r##"{
  "@context": "http://environment.data.gov.uk/flood-monitoring/meta/context.jsonld",
  "meta": { "limit": 5000 },
  "items": [
    {
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
      "stationReference": "3400TH",
      "label": "Kingston",
      "riverName": "River Thames",
      "town": "Kingston upon Thames",
      "catchmentName": "Thames",
      "lat": 51.41,
      "long": -0.3076,
      "status": "http://environment.data.gov.uk/flood-monitoring/def/core#Active",
      "measures": [
        { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s", "parameter": "flow" },
        { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD", "parameter": "level" }
      ]
    },
    {
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E5170",
      "stationReference": "E5170",
      "label": "Lea at Enfield",
      "riverName": "River Lea",
      "lat": [51.6448, 51.6449],
      "long": [-0.0143, -0.0144],
      "status": "Suspended",
      "measures": { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E5170-level-stage-i-15_min-m", "parameter": "level" }
    },
    {
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/NOLABEL",
      "stationReference": "NOLABEL",
      "riverName": "River Nowhere"
    },
    {
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/anon",
      "label": "Anonymous gauge"
    },
    {
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/L1931",
      "stationReference": "L1931",
      "label": ["Ambleside", "Ambleside Rydal"],
      "town": "Ambleside"
    }
  ]
}"##;

/// Readings for 3400TH: two level readings and one flow reading, newest first as the
/// upstream sorts them, plus a level reading whose value is missing.
pub const READINGS_JSON: &str = r#"{
  "items": [
    {
      "dateTime": "2024-01-01T02:00:00Z",
      "value": 1.9,
      "measure": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
        "parameter": "level",
        "qualifier": "Stage",
        "unitName": "mASD"
      }
    },
    {
      "dateTime": "2024-01-01T01:00:00Z",
      "value": 1.8,
      "measure": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
        "parameter": "level",
        "qualifier": "Stage",
        "unitName": "mASD"
      }
    },
    {
      "dateTime": "2024-01-01T01:00:00Z",
      "value": 95.2,
      "measure": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
        "parameter": "flow",
        "unitName": "m3/s"
      }
    },
    {
      "dateTime": "2024-01-01T00:00:00Z",
      "value": null,
      "measure": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
        "parameter": "level",
        "qualifier": "Stage",
        "unitName": "mASD"
      }
    }
  ]
}"#;

/// Readings whose measure is given only as a URI string.
pub const READINGS_BARE_MEASURE_JSON: &str = r#"{
  "items": [
    {
      "dateTime": "2024-01-01T00:15:00Z",
      "value": 0.412,
      "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/E5170-level-stage-i-15_min-m"
    }
  ]
}"#;

/// A batch where the second reading's timestamp cannot be parsed.
pub const READINGS_BAD_TIMESTAMP_JSON: &str = r#"{
  "items": [
    { "dateTime": "2024-01-01T00:00:00Z", "value": 1.0, "measure": { "parameter": "level" } },
    { "dateTime": "yesterday-ish", "value": 1.1, "measure": { "parameter": "level" } }
  ]
}"#;

pub const EMPTY_ITEMS_JSON: &str = r#"{ "items": [] }"#;
