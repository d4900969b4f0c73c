//! Accommodation Advisor - proximity search between hotels and rentals
//!
//! Given a hotel, finds the best-rated nearby short-term rentals from the
//! listings dataset; given a rental listing, finds nearby hotels from
//! OpenStreetMap data.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Advisor, AdvisorError, Ranker, distance::{haversine_distance, calculate_bounding_box}};
pub use crate::models::{GeoPoint, BoundingBox, Candidate, Lodging, Listing, QueryEnvelope, Direction, ResultLimits};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let center = GeoPoint::new(40.7128, -74.0060).unwrap();
        let bbox = calculate_bounding_box(&center, 10.0);
        assert!(bbox.min_lat < 40.7128);
        assert_eq!(haversine_distance(&center, &center), 0.0);
    }
}
