use crate::readings::error::ExportError;
use thiserror::Error;

/// Failure to retrieve a response from the upstream flood-monitoring API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Cannot build a request URL from base '{0}'")]
    InvalidUrl(String),
}

/// The upstream answered, but the payload could not be turned into stations or readings.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse {what} JSON")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // One bad timestamp invalidates the whole batch.
    #[error("Invalid reading timestamp '{value}'")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Reading at position {index} has no timestamp")]
    MissingTimestamp { index: usize },
}

#[derive(Debug, Error)]
pub enum FloodMonitoringError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Configured {0} is out of range")]
    InvalidConfig(&'static str),
}
