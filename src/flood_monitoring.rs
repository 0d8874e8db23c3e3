//! The client a dashboard talks to: station catalog, per-station readings and filtering,
//! wired together from one [`ClientConfig`].

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::FloodMonitoringError;
use crate::outcome::FetchOutcome;
use crate::readings::fetcher::ReadingFetcher;
use crate::stations::catalog::StationCatalog;
use crate::stations::filter::{distance_km, Proximity, StationFilter};
use crate::types::reading::Reading;
use crate::types::station::{LatLon, Station};
use crate::upstream::Upstream;
use bon::bon;
use log::warn;
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// Radius used by [`FloodMonitoring::find_stations`] when only a centre is given.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Client for the flood-monitoring API.
///
/// Station lists and readings are cached in memory for the TTLs in [`ClientConfig`];
/// failed fetches are never cached.
///
/// # Examples
///
/// ```no_run
/// # use flood_monitoring::{FloodMonitoring, FloodMonitoringError};
/// # async fn run() -> Result<(), FloodMonitoringError> {
/// let client = FloodMonitoring::builder().build()?;
/// let thames = client
///     .find_stations()
///     .river("River Thames")
///     .status("Active")
///     .call()
///     .await?;
/// if let Some(station) = thames.first() {
///     let readings = client.readings(&station.id).await?;
///     println!("{}: {} readings", station.label, readings.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct FloodMonitoring {
    config: ClientConfig,
    catalog: StationCatalog,
    readings: ReadingFetcher,
}

#[bon]
impl FloodMonitoring {
    /// Builds a client. Without a `clock` the system clock is used.
    ///
    /// # Errors
    ///
    /// [`FloodMonitoringError::InvalidBaseUrl`] if `config.base_url` is not an absolute
    /// http(s) URL, [`FloodMonitoringError::HttpClient`] if the HTTP client cannot be
    /// built, and [`FloodMonitoringError::InvalidConfig`] for an unrepresentable window.
    #[builder]
    pub fn new(
        #[builder(default)] config: ClientConfig,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<Self, FloodMonitoringError> {
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        let upstream = Arc::new(Upstream::new(&config.base_url, config.request_timeout)?);

        Ok(Self {
            catalog: StationCatalog::new(
                upstream.clone(),
                config.station_limit,
                config.station_ttl,
                clock.clone(),
            ),
            readings: ReadingFetcher::new(
                upstream,
                config.readings_window,
                config.readings_ttl,
                clock,
            )?,
            config,
        })
    }

    /// A client configured by [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, FloodMonitoringError> {
        Self::builder().config(ClientConfig::from_env()).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Every station, ordered by label.
    pub async fn stations(&self) -> Result<Arc<Vec<Station>>, FloodMonitoringError> {
        self.catalog.fetch_stations().await
    }

    /// Readings for one station over the configured trailing window.
    pub async fn readings(&self, station_id: &str) -> Result<Arc<Vec<Reading>>, FloodMonitoringError> {
        self.readings.fetch_readings(station_id).await
    }

    /// Fetches the catalog and narrows it.
    ///
    /// With `near`, only stations within `max_distance_km` (default
    /// [`DEFAULT_MAX_DISTANCE_KM`]) are kept and the result is ordered nearest first;
    /// otherwise the catalog's label order is kept. `limit` truncates the result.
    #[builder]
    pub async fn find_stations(
        &self,
        #[builder(into)] query: Option<String>,
        #[builder(into)] river: Option<String>,
        #[builder(into)] status: Option<String>,
        near: Option<LatLon>,
        max_distance_km: Option<f64>,
        limit: Option<usize>,
    ) -> Result<Vec<Station>, FloodMonitoringError> {
        let stations = self.stations().await?;
        let filter = StationFilter {
            query,
            river,
            status,
            near: near.map(|center| Proximity {
                center,
                max_distance_km: max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            }),
        };

        let mut found = filter.apply(&stations);
        if let Some(center) = near {
            found.sort_by_cached_key(|station| {
                OrderedFloat(
                    station
                        .location()
                        .map_or(f64::INFINITY, |at| distance_km(center, at)),
                )
            });
        }
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    /// Like [`FloodMonitoring::stations`], but a failure gives an empty list and a notice.
    pub async fn load_stations(&self) -> FetchOutcome<Station> {
        let outcome = FetchOutcome::from_result("stations", self.stations().await);
        if let Some(notice) = outcome.notice() {
            warn!("{}", notice);
        }
        outcome
    }

    /// Like [`FloodMonitoring::readings`], but a failure gives an empty list and a notice.
    pub async fn load_readings(&self, station_id: &str) -> FetchOutcome<Reading> {
        let outcome = FetchOutcome::from_result("readings", self.readings(station_id).await);
        if let Some(notice) = outcome.notice() {
            warn!("{} (station {})", notice, station_id);
        }
        outcome
    }

    /// Forgets cached stations and readings.
    pub async fn clear_cache(&self) {
        self.catalog.invalidate().await;
        self.readings.clear().await;
    }
}
