use crate::cache::ttl_cache::TtlCache;
use crate::clock::Clock;
use crate::error::{FloodMonitoringError, ParseError};
use crate::types::api::{entry_count, first_number, first_text, ListResponse, RawStation};
use crate::types::station::{Station, UNKNOWN};
use crate::upstream::Upstream;
use crate::utils::status_from_uri;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// The full station list, fetched in one request and cached under a single key.
pub struct StationCatalog {
    upstream: Arc<Upstream>,
    limit: usize,
    cache: TtlCache<(), Arc<Vec<Station>>>,
}

impl StationCatalog {
    pub fn new(upstream: Arc<Upstream>, limit: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            upstream,
            limit,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// All stations ordered by label. Served from the cache while it is fresh;
    /// failures are returned as errors and leave the cache empty.
    pub async fn fetch_stations(&self) -> Result<Arc<Vec<Station>>, FloodMonitoringError> {
        self.cache
            .get_or_try_insert_with((), || self.download())
            .await
    }

    /// Drops the cached list so the next call goes to the network.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }

    async fn download(&self) -> Result<Arc<Vec<Station>>, FloodMonitoringError> {
        info!(
            "Station list not cached, fetching up to {} stations from {}",
            self.limit,
            self.upstream.base_url()
        );
        let body = self
            .upstream
            .get_text(&["id", "stations"], &[("_limit", self.limit.to_string())])
            .await?;

        let parse_start = std::time::Instant::now();
        let stations = parse_stations(&body)?;
        info!(
            "Parsed {} stations in {:?}",
            stations.len(),
            parse_start.elapsed()
        );
        Ok(Arc::new(stations))
    }
}

/// Turns a `/id/stations` response body into stations sorted by label.
///
/// Records without a `stationReference` or `label` are skipped silently.
///
/// # Errors
/// [`ParseError::Json`] when the body is not a JSON object of the expected shape.
pub fn parse_stations(json: &str) -> Result<Vec<Station>, ParseError> {
    let response: ListResponse<RawStation> =
        serde_json::from_str(json).map_err(|e| ParseError::Json {
            what: "station list",
            source: e,
        })?;

    let total = response.items.len();
    let mut stations: Vec<Station> = response
        .items
        .into_iter()
        .filter_map(normalize_station)
        .collect();

    if stations.len() < total {
        debug!(
            "Skipped {} station records without a reference or label",
            total - stations.len()
        );
    }

    stations.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(stations)
}

fn normalize_station(raw: RawStation) -> Option<Station> {
    let id = first_text(raw.station_reference.as_ref())?.to_string();
    let label = first_text(raw.label.as_ref())?.to_string();

    let status = first_text(raw.status.as_ref())
        .map(|status| status_from_uri(status).to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Some(Station {
        id,
        label,
        river: first_text(raw.river_name.as_ref())
            .unwrap_or(UNKNOWN)
            .to_string(),
        town: first_text(raw.town.as_ref()).map(str::to_string),
        catchment: first_text(raw.catchment_name.as_ref()).map(str::to_string),
        latitude: first_number(raw.lat.as_ref()),
        longitude: first_number(raw.long.as_ref()),
        status,
        measure_count: entry_count(raw.measures.as_ref()),
    })
}
