use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::GeoPoint;
use crate::services::capabilities::GeocodeLookup;

/// Errors that can occur when interacting with Nominatim
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Search result as returned by `/search?format=jsonv2`
#[derive(Debug, Clone, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim geocoding client
///
/// Built once at startup and shared across requests. Nominatim's usage
/// policy requires an identifying User-Agent on every request.
pub struct NominatimClient {
    base_url: String,
    client: Client,
}

impl NominatimClient {
    /// Create a new Nominatim client
    pub fn new(
        base_url: String,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { base_url, client })
    }

    fn search_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=jsonv2&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address)
        )
    }
}

#[async_trait]
impl GeocodeLookup for NominatimClient {
    async fn resolve(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = self.search_url(address);

        tracing::info!("Nominatim geocode query: {}", address);
        tracing::debug!("Geocoding via: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Geocoding failed: {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(format!("Failed to parse places: {}", e)))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("Invalid latitude '{}'", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("Invalid longitude '{}'", place.lon)))?;

        let point = GeoPoint::new(latitude, longitude).ok_or_else(|| {
            GeocodeError::InvalidResponse(format!(
                "Coordinates out of range: ({}, {})",
                latitude, longitude
            ))
        })?;

        tracing::info!(
            "Nominatim geocode result: {} -> ({}, {})",
            place.display_name.as_deref().unwrap_or(address),
            point.latitude,
            point.longitude
        );

        Ok(Some(point))
    }
}
