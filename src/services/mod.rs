// Service exports
pub mod capabilities;
pub mod nominatim;
pub mod overpass;
pub mod postgres;

pub use capabilities::{CategoryFilter, GeocodeLookup, ListingQuery, ListingStore, MapPoiLookup};
pub use nominatim::{NominatimClient, GeocodeError};
pub use overpass::{OverpassClient, MapDataError};
pub use postgres::{PostgresClient, StoreError};
