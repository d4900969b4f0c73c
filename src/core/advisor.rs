use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use crate::core::{
    distance::calculate_bounding_box,
    normalize::{normalize_all, DropStats},
    ranking::Ranker,
};
use crate::models::{Candidate, Direction, GeoPoint, QueryEnvelope};
use crate::services::{
    CategoryFilter, GeocodeLookup, ListingQuery, ListingStore, MapPoiLookup, StoreError,
};

static LISTING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/rooms/(\d+)").expect("valid regex"));

pub const DEFAULT_LISTING_URL_BASE: &str = "https://www.airbnb.com/rooms/";

/// Errors surfaced to callers of the [`Advisor`]
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Extract the numeric listing identifier from a `/rooms/<id>` reference
pub fn parse_listing_id(reference: &str) -> Option<i64> {
    LISTING_ID_RE
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// Query orchestrator for both search directions
///
/// Holds long-lived clients for the external capabilities; every query is
/// resolved and ranked from scratch, so one instance serves all requests.
pub struct Advisor {
    geocoder: Arc<dyn GeocodeLookup>,
    store: Arc<dyn ListingStore>,
    map_data: Arc<dyn MapPoiLookup>,
    ranker: Ranker,
    hotel_categories: CategoryFilter,
    listing_url_base: String,
}

impl Advisor {
    pub fn new(
        geocoder: Arc<dyn GeocodeLookup>,
        store: Arc<dyn ListingStore>,
        map_data: Arc<dyn MapPoiLookup>,
        ranker: Ranker,
    ) -> Self {
        Self {
            geocoder,
            store,
            map_data,
            ranker,
            hotel_categories: CategoryFilter::default(),
            listing_url_base: DEFAULT_LISTING_URL_BASE.to_string(),
        }
    }

    pub fn with_hotel_categories(mut self, categories: CategoryFilter) -> Self {
        self.hotel_categories = categories;
        self
    }

    pub fn with_listing_url_base(mut self, base: impl Into<String>) -> Self {
        self.listing_url_base = base.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn ListingStore> {
        &self.store
    }

    /// Find locally-hosted rentals near a named hotel
    ///
    /// # Pipeline
    /// 1. Geocode `"{hotel_name}, {city}"`
    /// 2. Load every locally-hosted rental with coordinates
    /// 3. Normalize rows, dropping unusable ones
    /// 4. Rank by rating within `radius_km`, capped
    pub async fn rentals_near_hotel(
        &self,
        hotel_name: &str,
        city: &str,
        radius_km: f64,
    ) -> Result<QueryEnvelope, AdvisorError> {
        let address = format!("{}, {}", hotel_name, city);

        // Provider failures and empty answers both surface as NotFound
        let origin = match self.geocoder.resolve(&address).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                tracing::warn!("No location found for {}", address);
                return Err(AdvisorError::NotFound("Hotel not found".to_string()));
            }
            Err(e) => {
                tracing::error!("Error geocoding {}: {}", address, e);
                return Err(AdvisorError::NotFound("Hotel not found".to_string()));
            }
        };

        let rows = self
            .store
            .execute(&ListingQuery::LocalHostRentals)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load rental listings: {}", e);
                e
            })?;

        let total_candidates = rows.len();
        let (lodgings, drops) = normalize_all(
            rows.into_iter().map(Candidate::DatabaseRow),
            &self.listing_url_base,
        );
        log_drops(&drops);

        let results = self
            .ranker
            .rank(&origin, lodgings, radius_km, Direction::RentalsNearHotel);

        tracing::info!(
            "Returning {} rentals near '{}' (from {} candidates, {} dropped)",
            results.len(),
            address,
            total_candidates,
            drops.total()
        );

        Ok(QueryEnvelope { origin, results })
    }

    /// Find hotels near a rental listing
    ///
    /// # Pipeline
    /// 1. Extract the listing id from the `/rooms/<id>` reference
    /// 2. Look up the listing's coordinates
    /// 3. Query map data inside the radius' bounding box
    /// 4. Normalize elements and rank by distance within `radius_km`
    pub async fn hotels_near_rental(
        &self,
        listing_reference: &str,
        radius_km: f64,
    ) -> Result<QueryEnvelope, AdvisorError> {
        let listing_id = parse_listing_id(listing_reference).ok_or_else(|| {
            AdvisorError::InvalidInput("Invalid Airbnb listing URL".to_string())
        })?;

        let rows = self
            .store
            .execute(&ListingQuery::ListingCoordinates { listing_id })
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up listing {}: {}", listing_id, e);
                e
            })?;

        let origin = rows
            .first()
            .and_then(|row| match (row.latitude, row.longitude) {
                (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
                _ => None,
            })
            .ok_or_else(|| {
                tracing::warn!("Listing {} has no usable coordinates", listing_id);
                AdvisorError::NotFound("Property not included in our database.".to_string())
            })?;

        let bbox = calculate_bounding_box(&origin, radius_km);

        // A failing map provider degrades to an empty result set
        let elements = match self.map_data.find_near(&bbox, &self.hotel_categories).await {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!("Map data lookup failed near listing {}: {}", listing_id, e);
                Vec::new()
            }
        };

        let total_candidates = elements.len();
        let mut drops = DropStats::default();
        let candidates: Vec<Candidate> = elements
            .into_iter()
            .filter_map(|element| match Candidate::try_from(element) {
                Ok(candidate) => Some(candidate),
                Err(reason) => {
                    tracing::debug!("Dropping map element: {}", reason);
                    drops.record(reason);
                    None
                }
            })
            .collect();

        let (lodgings, normalize_drops) = normalize_all(candidates, &self.listing_url_base);
        drops.merge(normalize_drops);
        log_drops(&drops);

        let results = self
            .ranker
            .rank(&origin, lodgings, radius_km, Direction::HotelsNearRental);

        tracing::info!(
            "Returning {} hotels near listing {} (from {} elements, {} dropped)",
            results.len(),
            listing_id,
            total_candidates,
            drops.total()
        );

        Ok(QueryEnvelope { origin, results })
    }
}

fn log_drops(drops: &DropStats) {
    for (reason, count) in &drops.by_reason {
        tracing::debug!("Dropped {} candidates: {}", count, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_id() {
        assert_eq!(parse_listing_id("https://www.airbnb.com/rooms/1234567890"), Some(1234567890));
        assert_eq!(parse_listing_id("https://www.airbnb.co.uk/rooms/42?adults=2"), Some(42));
        assert_eq!(parse_listing_id("/rooms/7/photos"), Some(7));
    }

    #[test]
    fn test_parse_listing_id_rejects_missing_or_oversized() {
        assert_eq!(parse_listing_id("https://www.airbnb.com/experiences/123"), None);
        assert_eq!(parse_listing_id("https://www.airbnb.com/rooms/"), None);
        assert_eq!(parse_listing_id("no digits here"), None);
        assert_eq!(parse_listing_id("/rooms/99999999999999999999999"), None);
    }

    #[test]
    fn test_error_messages() {
        let err = AdvisorError::NotFound("Hotel not found".to_string());
        assert_eq!(err.to_string(), "Not found: Hotel not found");

        let err = AdvisorError::InvalidInput("Invalid Airbnb listing URL".to_string());
        assert_eq!(err.to_string(), "Invalid input: Invalid Airbnb listing URL");
    }
}
