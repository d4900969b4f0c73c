// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{GeoPoint, BoundingBox, ListingRow, MapCenter, MapElement, DropReason, Candidate, Lodging, Listing, RankedResult, Direction, QueryEnvelope, ResultLimits};
pub use requests::{RentalsNearHotelQuery, HotelsNearRentalQuery};
pub use responses::{AirbnbResponse, AirbnbSearchResponse, HotelResponse, HotelSearchResponse, WelcomeResponse, HealthResponse, ErrorResponse};
