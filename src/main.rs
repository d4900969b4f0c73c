use accommodation_advisor::config::Settings;
use accommodation_advisor::core::{Advisor, Ranker};
use accommodation_advisor::models::ErrorResponse;
use accommodation_advisor::routes::{self, search::AppState};
use accommodation_advisor::services::{CategoryFilter, NominatimClient, OverpassClient, PostgresClient};
use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for malformed query strings
#[derive(Debug)]
struct QueryError(ErrorResponse);

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for QueryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    QueryError(ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_logging(default_level: &str, default_format: &str) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(io_error("Configuration error", e));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Accommodation Advisor service...");

    let geocoder = NominatimClient::new(
        settings.geocoding.endpoint.clone(),
        &settings.geocoding.user_agent,
        settings.geocoding.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create geocoding client: {}", e);
        io_error("Geocoding client error", e)
    })?;

    info!("Geocoding client initialized ({})", settings.geocoding.endpoint);

    let map_data = OverpassClient::new(settings.map_data.endpoint.clone(), settings.map_data.timeout())
        .map_err(|e| {
            error!("Failed to create map data client: {}", e);
            io_error("Map data client error", e)
        })?;

    info!("Map data client initialized ({})", settings.map_data.endpoint);

    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        io_error("PostgreSQL connection error", e)
    })?;

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    let limits = settings.search.result_limits();
    let advisor = Advisor::new(
        Arc::new(geocoder),
        Arc::new(postgres),
        Arc::new(map_data),
        Ranker::new(limits),
    )
    .with_hotel_categories(CategoryFilter::lodging(settings.map_data.tourism_categories.clone()))
    .with_listing_url_base(settings.search.listing_url_base.clone());

    info!("Advisor initialized with result limits: {:?}", limits);

    let app_state = AppState {
        advisor: Arc::new(advisor),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
