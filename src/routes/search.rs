use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;

use crate::core::{Advisor, AdvisorError};
use crate::models::{
    AirbnbSearchResponse, ErrorResponse, HealthResponse, HotelSearchResponse,
    HotelsNearRentalQuery, RentalsNearHotelQuery, WelcomeResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<Advisor>,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(read_root))
        .route("/health", web::get().to(health_check))
        .route("/find_airbnbs_near_hotel", web::get().to(find_airbnbs_near_hotel))
        .route("/find_hotels_near_airbnb", web::get().to(find_hotels_near_airbnb));
}

async fn read_root() -> impl Responder {
    HttpResponse::Ok().json(WelcomeResponse {
        message: "Welcome to the Accommodation Advisor API!".to_string(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.advisor.store().health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find rentals near a hotel
///
/// GET /find_airbnbs_near_hotel?hotel_name={name}&city={city}&radius_km={km}
async fn find_airbnbs_near_hotel(
    state: web::Data<AppState>,
    query: web::Query<RentalsNearHotelQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let span = tracing::info_span!(
        "rentals_near_hotel",
        request_id = %uuid::Uuid::new_v4(),
        hotel = %query.hotel_name,
        city = %query.city,
    );

    let result = state
        .advisor
        .rentals_near_hotel(&query.hotel_name, &query.city, query.radius_km)
        .instrument(span)
        .await;

    match result {
        Ok(envelope) => HttpResponse::Ok().json(AirbnbSearchResponse::from(envelope)),
        Err(e) => error_response(&e),
    }
}

/// Find hotels near a rental listing
///
/// GET /find_hotels_near_airbnb?listing_url={url}&radius_km={km}
async fn find_hotels_near_airbnb(
    state: web::Data<AppState>,
    query: web::Query<HotelsNearRentalQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let span = tracing::info_span!(
        "hotels_near_rental",
        request_id = %uuid::Uuid::new_v4(),
        listing_url = %query.listing_url,
    );

    let result = state
        .advisor
        .hotels_near_rental(&query.listing_url, query.radius_km)
        .instrument(span)
        .await;

    match result {
        Ok(envelope) => HttpResponse::Ok().json(HotelSearchResponse::from(envelope)),
        Err(e) => error_response(&e),
    }
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn error_response(err: &AdvisorError) -> HttpResponse {
    match err {
        AdvisorError::NotFound(detail) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: detail.clone(),
            status_code: 404,
        }),
        AdvisorError::InvalidInput(detail) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message: detail.clone(),
            status_code: 400,
        }),
        AdvisorError::Storage(e) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "storage_error".to_string(),
            message: e.to_string(),
            status_code: 500,
        }),
    }
}
