use serde::{Deserialize, Serialize};
use crate::models::domain::{Listing, QueryEnvelope};

/// A rental listing near a hotel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirbnbResponse {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub distance_km: f64,
    pub listing_url: Option<String>,
}

impl From<Listing> for AirbnbResponse {
    fn from(listing: Listing) -> Self {
        Self {
            name: listing.name,
            latitude: listing.location.latitude,
            longitude: listing.location.longitude,
            price: listing.price,
            rating: listing.rating,
            distance_km: listing.distance_km,
            listing_url: listing.external_reference,
        }
    }
}

/// Response for the rentals-near-hotel endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirbnbSearchResponse {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub airbnbs: Vec<AirbnbResponse>,
}

impl From<QueryEnvelope> for AirbnbSearchResponse {
    fn from(envelope: QueryEnvelope) -> Self {
        Self {
            origin_latitude: envelope.origin.latitude,
            origin_longitude: envelope.origin.longitude,
            airbnbs: envelope.results.into_iter().map(AirbnbResponse::from).collect(),
        }
    }
}

/// A hotel near a rental listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelResponse {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub distance_km: f64,
    #[serde(default)]
    pub website_url: Option<String>,
}

impl From<Listing> for HotelResponse {
    fn from(listing: Listing) -> Self {
        Self {
            name: listing.name,
            latitude: listing.location.latitude,
            longitude: listing.location.longitude,
            price: listing.price,
            rating: listing.rating,
            distance_km: listing.distance_km,
            website_url: listing.external_reference,
        }
    }
}

/// Response for the hotels-near-rental endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelSearchResponse {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub hotels: Vec<HotelResponse>,
}

impl From<QueryEnvelope> for HotelSearchResponse {
    fn from(envelope: QueryEnvelope) -> Self {
        Self {
            origin_latitude: envelope.origin.latitude,
            origin_longitude: envelope.origin.longitude,
            hotels: envelope.results.into_iter().map(HotelResponse::from).collect(),
        }
    }
}

/// Root endpoint greeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::GeoPoint;

    fn listing(reference: Option<&str>) -> Listing {
        Listing {
            name: "Harbour View".to_string(),
            location: GeoPoint::new(51.51, -0.11).unwrap(),
            price: Some(120.0),
            rating: Some(4.8),
            distance_km: 1.2,
            external_reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn test_airbnb_envelope_shape() {
        let envelope = QueryEnvelope {
            origin: GeoPoint::new(51.5, -0.1).unwrap(),
            results: vec![listing(Some("https://www.airbnb.com/rooms/7"))],
        };

        let json = serde_json::to_value(AirbnbSearchResponse::from(envelope)).unwrap();
        assert_eq!(json["origin_latitude"], 51.5);
        assert_eq!(json["airbnbs"][0]["listing_url"], "https://www.airbnb.com/rooms/7");
        assert_eq!(json["airbnbs"][0]["latitude"], 51.51);
    }

    #[test]
    fn test_hotel_envelope_keeps_null_website() {
        let envelope = QueryEnvelope {
            origin: GeoPoint::new(51.5, -0.1).unwrap(),
            results: vec![listing(None)],
        };

        let json = serde_json::to_value(HotelSearchResponse::from(envelope)).unwrap();
        assert!(json["hotels"][0]["website_url"].is_null());
        assert_eq!(json["hotels"][0]["distance_km"], 1.2);
    }
}
