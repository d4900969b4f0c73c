use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point on the Earth's surface in decimal degrees
///
/// Construct through [`GeoPoint::new`], which rejects non-finite values and
/// coordinates outside latitude [-90, 90] / longitude [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self { latitude, longitude })
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Row shape returned by the listing store
///
/// Every column is optional; the normalizer decides what is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingRow {
    pub listing_id: Option<i64>,
    pub host_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

/// Derived center of a way or relation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Raw element as returned by the map-data provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<MapCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Why a candidate was excluded during normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropReason {
    MissingName,
    MissingCoordinates,
    InvalidCoordinates,
    MissingCenter,
    UnsupportedElement(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::MissingName => write!(f, "missing name"),
            DropReason::MissingCoordinates => write!(f, "missing coordinates"),
            DropReason::InvalidCoordinates => write!(f, "coordinates out of range"),
            DropReason::MissingCenter => write!(f, "area without center"),
            DropReason::UnsupportedElement(kind) => write!(f, "unsupported element type '{}'", kind),
        }
    }
}

/// A not-yet-validated record from one of the data sources
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// Rental row from the listing store
    DatabaseRow(ListingRow),
    /// Map node with direct coordinates
    MapPoint {
        latitude: f64,
        longitude: f64,
        tags: HashMap<String, String>,
    },
    /// Way or relation that carries a derived center
    MapAreaWithCenter {
        center: MapCenter,
        tags: HashMap<String, String>,
    },
    /// Way or relation without a center; never yields a listing
    MapAreaWithoutCenter { tags: HashMap<String, String> },
}

impl TryFrom<MapElement> for Candidate {
    type Error = DropReason;

    fn try_from(element: MapElement) -> Result<Self, Self::Error> {
        match element.element_type.as_str() {
            "node" => match (element.lat, element.lon) {
                (Some(latitude), Some(longitude)) => Ok(Candidate::MapPoint {
                    latitude,
                    longitude,
                    tags: element.tags,
                }),
                _ => Err(DropReason::MissingCoordinates),
            },
            // Overpass reports "relation"; "rel" is the query-language shorthand
            "way" | "relation" | "rel" => Ok(match element.center {
                Some(center) => Candidate::MapAreaWithCenter {
                    center,
                    tags: element.tags,
                },
                None => Candidate::MapAreaWithoutCenter { tags: element.tags },
            }),
            other => Err(DropReason::UnsupportedElement(other.to_string())),
        }
    }
}

/// Normalized candidate before a distance has been attached
#[derive(Debug, Clone, PartialEq)]
pub struct Lodging {
    pub name: String,
    pub location: GeoPoint,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub external_reference: Option<String>,
}

/// Normalized, distance-annotated result entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub name: String,
    pub location: GeoPoint,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub distance_km: f64,
    pub external_reference: Option<String>,
}

impl Listing {
    pub fn from_lodging(lodging: Lodging, distance_km: f64) -> Self {
        Self {
            name: lodging.name,
            location: lodging.location,
            price: lodging.price,
            rating: lodging.rating,
            distance_km,
            external_reference: lodging.external_reference,
        }
    }

    pub fn has_rating(&self) -> bool {
        self.rating.is_some()
    }
}

/// Ordered results, already filtered and truncated
pub type RankedResult = Vec<Listing>;

/// Which query shape is being executed; selects the ranking policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RentalsNearHotel,
    HotelsNearRental,
}

/// Origin plus ranked results for a single query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEnvelope {
    pub origin: GeoPoint,
    pub results: RankedResult,
}

/// Per-direction result caps. `None` means uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimits {
    pub rentals: Option<usize>,
    pub hotels: Option<usize>,
}

impl ResultLimits {
    pub fn for_direction(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::RentalsNearHotel => self.rentals,
            Direction::HotelsNearRental => self.hotels,
        }
    }
}

impl Default for ResultLimits {
    fn default() -> Self {
        Self {
            rentals: Some(10),
            hotels: None,
        }
    }
}
