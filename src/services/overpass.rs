use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{BoundingBox, MapElement};
use crate::services::capabilities::{CategoryFilter, MapPoiLookup};

/// Errors that can occur when interacting with the Overpass API
#[derive(Debug, Error)]
pub enum MapDataError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<MapElement>,
}

/// Overpass API client for OpenStreetMap points of interest
pub struct OverpassClient {
    endpoint: String,
    timeout_secs: u64,
    client: Client,
}

impl OverpassClient {
    /// Create a new Overpass client
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, MapDataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            timeout_secs: timeout.as_secs().max(1),
            client,
        })
    }

    /// Build an Overpass QL query for nodes, ways and relations in `bbox`
    ///
    /// `out center tags` makes Overpass attach a derived center to ways and
    /// relations so they can be placed on the map.
    pub fn build_query(bbox: &BoundingBox, filter: &CategoryFilter, timeout_secs: u64) -> String {
        let selector = format!("[\"{}\"~\"{}\"]", filter.key, filter.pattern());
        let area = format!(
            "({:.6},{:.6},{:.6},{:.6})",
            bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
        );

        format!(
            "[out:json][timeout:{timeout}];\n(\n  node{sel}{area};\n  way{sel}{area};\n  relation{sel}{area};\n);\nout center tags;",
            timeout = timeout_secs,
            sel = selector,
            area = area,
        )
    }
}

#[async_trait]
impl MapPoiLookup for OverpassClient {
    async fn find_near(
        &self,
        bbox: &BoundingBox,
        filter: &CategoryFilter,
    ) -> Result<Vec<MapElement>, MapDataError> {
        let query = Self::build_query(bbox, filter, self.timeout_secs);

        tracing::debug!("Overpass query: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        tracing::info!("Overpass response status: {}", response.status());

        if !response.status().is_success() {
            return Err(MapDataError::ApiError(format!(
                "Overpass query failed: {}",
                response.status()
            )));
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| MapDataError::InvalidResponse(format!("Failed to parse elements: {}", e)))?;

        tracing::debug!("Overpass returned {} elements", body.elements.len());

        Ok(body.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox {
            min_lat: 51.45,
            max_lat: 51.55,
            min_lon: -0.2,
            max_lon: 0.0,
        }
    }

    #[test]
    fn test_build_query() {
        let query = OverpassClient::build_query(&bbox(), &CategoryFilter::lodging(vec!["hotel".into(), "motel".into()]), 10);

        assert!(query.starts_with("[out:json][timeout:10];"));
        assert!(query.contains("node[\"tourism\"~\"hotel|motel\"](51.450000,-0.200000,51.550000,0.000000);"));
        assert!(query.contains("way[\"tourism\"~\"hotel|motel\"]"));
        assert!(query.contains("relation[\"tourism\"~\"hotel|motel\"]"));
        assert!(query.ends_with("out center tags;"));
    }

    #[tokio::test]
    async fn test_find_near_decodes_elements() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/interpreter")
            .match_body(mockito::Matcher::Regex("data=".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"elements":[
                    {"type":"node","id":1,"lat":51.5,"lon":-0.1,"tags":{"name":"Inn"}},
                    {"type":"way","id":2,"center":{"lat":51.51,"lon":-0.11},"tags":{"name":"Lodge"}},
                    {"type":"relation","id":3,"tags":{"name":"Estate"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OverpassClient::new(format!("{}/api/interpreter", server.url()), Duration::from_secs(10)).unwrap();
        let elements = client.find_near(&bbox(), &CategoryFilter::default()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].lat, Some(51.5));
        assert_eq!(elements[1].center.map(|c| c.lat), Some(51.51));
        assert!(elements[2].center.is_none());
        assert_eq!(elements[2].tags.get("name").map(String::as_str), Some("Estate"));
    }

    #[tokio::test]
    async fn test_find_near_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/interpreter")
            .with_status(429)
            .create_async()
            .await;

        let client = OverpassClient::new(format!("{}/api/interpreter", server.url()), Duration::from_secs(10)).unwrap();

        assert!(matches!(
            client.find_near(&bbox(), &CategoryFilter::default()).await,
            Err(MapDataError::ApiError(_))
        ));
    }
}
