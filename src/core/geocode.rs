//! Geocoding client for address coordinates
//!
//! Thin client for a Nominatim-compatible search endpoint. Geocoding is
//! strictly a pre-step: it runs before distance resolution, and a miss is
//! a degraded input (`Ok(None)`), not a failure. Only transport-level
//! problems surface as errors.

use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::distance::Coordinates;
use crate::core::error::{Error, Result};

/// Maximum number of retry attempts for network errors
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Global HTTP client shared by all geocoder instances
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(format!("danfo-quote/{}", env!("DANFO_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Configuration for the geocoding endpoint
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible search service
    pub base_url: String,

    /// ISO country codes passed to the service to narrow results
    pub country_codes: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_codes: "ng".to_string(),
        }
    }
}

/// One result row from the search endpoint. Nominatim returns coordinates
/// as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Execute an operation with retry logic for network errors
async fn retry_on_network_error<F, Fut, T>(operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(Error::NetworkError(msg)) if attempt < MAX_RETRY_ATTEMPTS => {
                attempt += 1;
                let delay = BASE_RETRY_DELAY_MS * (1 << (attempt - 1));
                warn!("network error (attempt {attempt}): {msg}. Retrying in {delay}ms...");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Client for resolving free-text addresses to coordinates
pub struct Geocoder {
    config: GeocoderConfig,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder {
    /// Create a geocoder against the default public endpoint
    pub fn new() -> Self {
        Self {
            config: GeocoderConfig::default(),
        }
    }

    /// Create a geocoder with a custom endpoint configuration
    pub fn with_config(config: GeocoderConfig) -> Self {
        Self { config }
    }

    /// Look up coordinates for an address.
    ///
    /// Returns `Ok(None)` when the service has no result for the address;
    /// the caller then proceeds with heuristic distance estimation.
    pub async fn lookup(&self, address: &str) -> Result<Option<Coordinates>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        retry_on_network_error(|| self.lookup_once(address)).await
    }

    async fn lookup_once(&self, address: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.config.base_url);

        let response = GLOBAL_CLIENT
            .get(&url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "geocoding endpoint returned {}",
                response.status()
            )));
        }

        let hits: Vec<GeocodeHit> = response.json().await?;

        let Some(hit) = hits.first() else {
            debug!("no geocoding result for '{address}'");
            return Ok(None);
        };

        let lat = hit.lat.parse::<f64>();
        let lng = hit.lon.parse::<f64>();
        match (lat, lng) {
            (Ok(lat), Ok(lng)) => {
                debug!("geocoded '{address}' -> ({lat}, {lng})");
                Ok(Some(Coordinates { lat, lng }))
            }
            _ => Err(Error::GeocodingFailed(format!(
                "unparseable coordinates for '{address}': lat={} lon={}",
                hit.lat, hit.lon
            ))),
        }
    }
}
