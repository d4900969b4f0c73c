use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string for the rentals-near-hotel search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RentalsNearHotelQuery {
    #[validate(length(min = 1))]
    pub hotel_name: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub radius_km: f64,
}

/// Query string for the hotels-near-rental search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HotelsNearRentalQuery {
    #[validate(length(min = 1))]
    pub listing_url: String,
    pub radius_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hotel_name_fails_validation() {
        let query = RentalsNearHotelQuery {
            hotel_name: String::new(),
            city: "London".to_string(),
            radius_km: 5.0,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_valid_listing_query() {
        let query = HotelsNearRentalQuery {
            listing_url: "https://www.airbnb.com/rooms/42".to_string(),
            radius_km: 0.0,
        };
        assert!(query.validate().is_ok());
    }
}
