use async_trait::async_trait;

use crate::models::{BoundingBox, GeoPoint, ListingRow, MapElement};
use crate::services::nominatim::GeocodeError;
use crate::services::overpass::MapDataError;
use crate::services::postgres::StoreError;

/// Resolves free-text addresses to coordinates
///
/// `Ok(None)` means the provider answered but had no match; `Err` means the
/// provider itself failed (timeout, HTTP error, unreadable body).
#[async_trait]
pub trait GeocodeLookup: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// Queries the listing store understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingQuery {
    /// Every locally-hosted listing that has coordinates
    LocalHostRentals,
    /// The row for a single listing identifier
    ListingCoordinates { listing_id: i64 },
}

/// Runs a listing query and returns raw rows
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn execute(&self, query: &ListingQuery) -> Result<Vec<ListingRow>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Tag filter for points of interest, matched as `key ~ "v1|v2|..."`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub key: String,
    pub values: Vec<String>,
}

impl CategoryFilter {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Lodging categories under the `tourism` key
    pub fn lodging(values: Vec<String>) -> Self {
        Self::new("tourism", values)
    }

    pub fn pattern(&self) -> String {
        self.values.join("|")
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::lodging(
            ["hotel", "hostel", "motel", "guest_house", "chalet", "resort", "apartment"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
        )
    }
}

/// Finds map elements inside a bounding box
#[async_trait]
pub trait MapPoiLookup: Send + Sync {
    async fn find_near(
        &self,
        bbox: &BoundingBox,
        filter: &CategoryFilter,
    ) -> Result<Vec<MapElement>, MapDataError>;
}
