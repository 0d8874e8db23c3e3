use crate::error::{FetchError, FloodMonitoringError};
use log::{debug, warn};
use reqwest::{Client, Url};
use std::time::Duration;

/// HTTP access to the flood-monitoring API rooted at a configurable base URL.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    base_url: Url,
}

impl Upstream {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FloodMonitoringError> {
        let parsed = Url::parse(base_url).map_err(|e| FloodMonitoringError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(FloodMonitoringError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot have path segments".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FloodMonitoringError::HttpClient)?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded on its own,
    /// so a station id can never introduce extra path components.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `segments` with the given query and returns the body of a 2xx response.
    pub async fn get_text(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        let url_text = url.to_string();
        debug!("Requesting {}", url_text);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url_text.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url_text, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url_text,
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url_text, e),
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| FetchError::ResponseBody(url_text, e))
    }
}
