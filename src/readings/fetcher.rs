use crate::cache::ttl_cache::TtlCache;
use crate::clock::Clock;
use crate::error::{FloodMonitoringError, ParseError};
use crate::types::api::{ListResponse, RawMeasureRef, RawReading};
use crate::types::reading::Reading;
use crate::types::station::UNKNOWN;
use crate::upstream::Upstream;
use crate::utils::last_path_segment;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use log::info;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Recent readings for one station at a time, cached per station id.
pub struct ReadingFetcher {
    upstream: Arc<Upstream>,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
    cache: TtlCache<String, Arc<Vec<Reading>>>,
}

impl ReadingFetcher {
    pub fn new(
        upstream: Arc<Upstream>,
        window: Duration,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FloodMonitoringError> {
        let window = chrono::Duration::from_std(window)
            .map_err(|_| FloodMonitoringError::InvalidConfig("readings window"))?;
        Ok(Self {
            upstream,
            window,
            cache: TtlCache::new(ttl, clock.clone()),
            clock,
        })
    }

    /// Readings for `station_id` since `now - window`, in the order the upstream sent
    /// them. A station without readings in the window yields an empty list.
    ///
    /// # Errors
    /// [`FloodMonitoringError::Fetch`] on transport or HTTP failure,
    /// [`FloodMonitoringError::Parse`] if the body is malformed or any timestamp is bad.
    pub async fn fetch_readings(
        &self,
        station_id: &str,
    ) -> Result<Arc<Vec<Reading>>, FloodMonitoringError> {
        self.cache
            .get_or_try_insert_with(station_id.to_string(), || self.download(station_id))
            .await
    }

    pub async fn invalidate(&self, station_id: &str) {
        self.cache.invalidate(&station_id.to_string()).await;
    }

    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    /// Lower bound of the readings window, computed from the clock on every call.
    pub fn since(&self) -> DateTime<Utc> {
        self.clock.now() - self.window
    }

    async fn download(&self, station_id: &str) -> Result<Arc<Vec<Reading>>, FloodMonitoringError> {
        let since = self.since().to_rfc3339_opts(SecondsFormat::Secs, true);
        info!(
            "Readings for station {} not cached, fetching since {}",
            station_id, since
        );

        let body = self
            .upstream
            .get_text(
                &["id", "stations", station_id, "readings"],
                &[("since", since), ("_sorted", "true".to_string())],
            )
            .await?;

        let readings = parse_readings(station_id, &body)?;
        info!(
            "Fetched {} readings for station {}",
            readings.len(),
            station_id
        );
        Ok(Arc::new(readings))
    }
}

/// Turns a `/id/stations/{id}/readings` response body into readings, keeping the
/// upstream order.
///
/// # Errors
/// [`ParseError::Json`] for a malformed body; [`ParseError::InvalidTimestamp`] or
/// [`ParseError::MissingTimestamp`] if any single reading lacks a usable `dateTime`.
/// One bad timestamp fails the whole batch.
pub fn parse_readings(station_id: &str, json: &str) -> Result<Vec<Reading>, ParseError> {
    let response: ListResponse<RawReading> =
        serde_json::from_str(json).map_err(|e| ParseError::Json {
            what: "readings",
            source: e,
        })?;

    response
        .items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| normalize_reading(station_id, index, raw))
        .collect()
}

fn normalize_reading(station_id: &str, index: usize, raw: RawReading) -> Result<Reading, ParseError> {
    let timestamp = match raw.date_time.as_deref() {
        Some(text) => parse_timestamp(text)?,
        None => return Err(ParseError::MissingTimestamp { index }),
    };

    let (parameter, qualifier, unit, measure_id) = match raw.measure {
        Some(RawMeasureRef::Detailed(measure)) => (
            measure.parameter.unwrap_or_else(|| UNKNOWN.to_string()),
            measure.qualifier.unwrap_or_default(),
            measure.unit_name.unwrap_or_default(),
            measure
                .id
                .as_deref()
                .map(last_path_segment)
                .unwrap_or_default()
                .to_string(),
        ),
        Some(RawMeasureRef::Uri(uri)) => (
            UNKNOWN.to_string(),
            String::new(),
            String::new(),
            last_path_segment(&uri).to_string(),
        ),
        Some(RawMeasureRef::Other(_)) | None => {
            (UNKNOWN.to_string(), String::new(), String::new(), String::new())
        }
    };

    Ok(Reading {
        station_id: station_id.to_string(),
        timestamp,
        value: raw.value.as_ref().and_then(Value::as_f64),
        parameter,
        qualifier,
        unit,
        measure_id,
    })
}

/// RFC 3339 first; a timestamp without an offset is taken as UTC.
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(with_offset) => Ok(with_offset.with_timezone(&Utc)),
        Err(rfc_error) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| ParseError::InvalidTimestamp {
                value: text.to_string(),
                source: rfc_error,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fixtures::{
        EMPTY_ITEMS_JSON, READINGS_BAD_TIMESTAMP_JSON, READINGS_BARE_MEASURE_JSON, READINGS_JSON,
    };
    use crate::test_support::MockUpstream;
    use chrono::TimeZone;

    #[test]
    fn test_parse_readings_preserves_order_and_fields() {
        let readings = parse_readings("3400TH", READINGS_JSON).unwrap();
        assert_eq!(readings.len(), 4);

        let first = &readings[0];
        assert_eq!(first.station_id, "3400TH");
        assert_eq!(
            first.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap()
        );
        assert_eq!(first.value, Some(1.9));
        assert_eq!(first.parameter, "level");
        assert_eq!(first.qualifier, "Stage");
        assert_eq!(first.unit, "mASD");
        assert_eq!(first.measure_id, "3400TH-level-stage-i-15_min-mASD");

        let flow = &readings[2];
        assert_eq!(flow.parameter, "flow");
        assert_eq!(flow.qualifier, "", "missing qualifier becomes empty");
        assert_eq!(flow.unit, "m3/s");

        assert_eq!(readings[3].value, None);
    }

    #[test]
    fn test_parse_readings_bare_measure_uri() {
        let readings = parse_readings("E5170", READINGS_BARE_MEASURE_JSON).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].measure_id, "E5170-level-stage-i-15_min-m");
        assert_eq!(readings[0].parameter, "Unknown");
        assert_eq!(readings[0].unit, "");
        assert_eq!(readings[0].value, Some(0.412));
    }

    #[test]
    fn test_parse_readings_missing_measure_uses_defaults() {
        let json = r#"{"items": [{"dateTime": "2024-01-01T00:00:00Z", "value": 2}]}"#;
        let readings = parse_readings("X", json).unwrap();
        assert_eq!(readings[0].parameter, "Unknown");
        assert_eq!(readings[0].measure_id, "");
        assert_eq!(readings[0].value, Some(2.0));
    }

    #[test]
    fn test_bad_timestamp_fails_whole_batch() {
        let err = parse_readings("X", READINGS_BAD_TIMESTAMP_JSON).unwrap_err();
        match err {
            ParseError::InvalidTimestamp { value, .. } => assert_eq!(value, "yesterday-ish"),
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }

        let missing = r#"{"items": [{"value": 1.0}]}"#;
        assert!(matches!(
            parse_readings("X", missing),
            Err(ParseError::MissingTimestamp { index: 0 })
        ));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T01:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000").unwrap(), expected);
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_parse_readings_empty() {
        assert!(parse_readings("X", EMPTY_ITEMS_JSON).unwrap().is_empty());
    }

    fn fetcher(mock: &MockUpstream, clock: Arc<ManualClock>) -> ReadingFetcher {
        let upstream = Upstream::new(&mock.base_url(), Duration::from_secs(5)).unwrap();
        ReadingFetcher::new(
            Arc::new(upstream),
            Duration::from_secs(24 * 3600),
            Duration::from_secs(300),
            clock,
        )
        .unwrap()
    }

    fn start_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_fetch_readings_requests_trailing_window() {
        let mock = MockUpstream::start().await;
        mock.respond("/id/stations/3400TH/readings", 200, READINGS_JSON);
        let fetcher = fetcher(&mock, start_clock());

        let readings = fetcher.fetch_readings("3400TH").await.unwrap();
        assert_eq!(readings.len(), 4);
        assert_eq!(
            mock.requests(),
            vec!["/id/stations/3400TH/readings?since=2024-01-01T03%3A00%3A00Z&_sorted=true".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_readings_cached_per_station() {
        let mock = MockUpstream::start().await;
        mock.respond("/id/stations/3400TH/readings", 200, READINGS_JSON);
        mock.respond("/id/stations/E5170/readings", 200, READINGS_BARE_MEASURE_JSON);
        let clock = start_clock();
        let fetcher = fetcher(&mock, clock.clone());

        fetcher.fetch_readings("3400TH").await.unwrap();
        clock.advance(Duration::from_secs(120));
        fetcher.fetch_readings("3400TH").await.unwrap();
        let other = fetcher.fetch_readings("E5170").await.unwrap();

        assert_eq!(other.len(), 1);
        assert_eq!(mock.request_count("/id/stations/3400TH/readings"), 1);
        assert_eq!(mock.request_count("/id/stations/E5170/readings"), 1);

        clock.advance(Duration::from_secs(180));
        fetcher.fetch_readings("3400TH").await.unwrap();
        let requests = mock.requests();
        assert_eq!(mock.request_count("/id/stations/3400TH/readings"), 2);
        assert!(
            requests
                .last()
                .unwrap()
                .contains("since=2024-01-01T03%3A05%3A00Z"),
            "window follows the clock: {:?}",
            requests
        );
    }

    #[tokio::test]
    async fn test_invalidate_refetches_only_that_station() {
        let mock = MockUpstream::start().await;
        mock.respond("/id/stations/3400TH/readings", 200, READINGS_JSON);
        mock.respond("/id/stations/E5170/readings", 200, READINGS_BARE_MEASURE_JSON);
        let fetcher = fetcher(&mock, start_clock());

        fetcher.fetch_readings("3400TH").await.unwrap();
        fetcher.fetch_readings("E5170").await.unwrap();
        fetcher.invalidate("3400TH").await;
        fetcher.fetch_readings("3400TH").await.unwrap();
        fetcher.fetch_readings("E5170").await.unwrap();

        assert_eq!(mock.request_count("/id/stations/3400TH/readings"), 2);
        assert_eq!(mock.request_count("/id/stations/E5170/readings"), 1);
    }

    #[tokio::test]
    async fn test_fetch_readings_empty_window() {
        let mock = MockUpstream::start().await;
        mock.respond("/id/stations/QUIET/readings", 200, EMPTY_ITEMS_JSON);
        let fetcher = fetcher(&mock, start_clock());

        let readings = fetcher.fetch_readings("QUIET").await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_readings_bad_timestamp_is_parse_error() {
        let mock = MockUpstream::start().await;
        mock.respond("/id/stations/BAD/readings", 200, READINGS_BAD_TIMESTAMP_JSON);
        let fetcher = fetcher(&mock, start_clock());

        let err = fetcher.fetch_readings("BAD").await.unwrap_err();
        assert!(matches!(
            err,
            FloodMonitoringError::Parse(ParseError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_since_follows_clock() {
        let clock = start_clock();
        let upstream = Upstream::new("http://localhost", Duration::from_secs(5)).unwrap();
        let fetcher = ReadingFetcher::new(
            Arc::new(upstream),
            Duration::from_secs(24 * 3600),
            Duration::from_secs(300),
            clock.clone(),
        )
        .unwrap();

        assert_eq!(fetcher.since(), Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap());
        clock.advance(Duration::from_secs(3600));
        assert_eq!(fetcher.since(), Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap());
    }
}
