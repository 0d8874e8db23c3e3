//! Client configuration: where the upstream API lives, how many stations to ask for,
//! and how long results stay cached.

use bon::Builder;
use std::env;
use std::time::Duration;

/// Public Environment Agency real-time flood-monitoring API.
pub const DEFAULT_BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring";
/// Environment variable that overrides [`DEFAULT_BASE_URL`] in [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "FLOOD_MONITORING_BASE_URL";

pub const DEFAULT_STATION_LIMIT: usize = 5000;
pub const DEFAULT_STATION_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_READINGS_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_READINGS_WINDOW: Duration = Duration::from_secs(24 * 3600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`crate::FloodMonitoring`].
///
/// Every field has a default, so only the values that differ need to be set.
///
/// # Examples
///
/// ```
/// use flood_monitoring::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8080/flood-monitoring")
///     .readings_ttl(Duration::from_secs(60))
///     .build();
///
/// assert_eq!(config.station_limit, 5000);
/// assert_eq!(config.readings_ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Root of the API, without the `/id/...` part.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Value sent as `_limit` when listing stations.
    #[builder(default = DEFAULT_STATION_LIMIT)]
    pub station_limit: usize,
    #[builder(default = DEFAULT_STATION_TTL)]
    pub station_ttl: Duration,
    #[builder(default = DEFAULT_READINGS_TTL)]
    pub readings_ttl: Duration,
    /// How far back readings are requested, measured from the moment of each call.
    #[builder(default = DEFAULT_READINGS_WINDOW)]
    pub readings_window: Duration,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `FLOOD_MONITORING_BASE_URL` when it is set
    /// and not blank.
    pub fn from_env() -> Self {
        match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::builder().base_url(url.trim()).build(),
            _ => Self::default(),
        }
    }
}
