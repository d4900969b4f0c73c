use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::ListingRow;
use crate::services::capabilities::{ListingQuery, ListingStore};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

const LOCAL_HOST_RENTALS_SQL: &str = r#"
    SELECT
        listing_id::bigint AS listing_id,
        host_name,
        latitude::float8 AS latitude,
        longitude::float8 AS longitude,
        price::float8 AS price,
        review_scores_rating::float8 AS rating
    FROM dim_listings
    WHERE is_local_host = 1
      AND latitude IS NOT NULL
      AND longitude IS NOT NULL
"#;

const LISTING_COORDINATES_SQL: &str = r#"
    SELECT
        listing_id::bigint AS listing_id,
        host_name,
        latitude::float8 AS latitude,
        longitude::float8 AS longitude,
        price::float8 AS price,
        review_scores_rating::float8 AS rating
    FROM dim_listings
    WHERE listing_id = $1
"#;

/// PostgreSQL client for the rental listings dataset
///
/// The dataset is owned elsewhere; this client only reads `dim_listings`.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
        )
        .await
    }
}

fn listing_row(row: &PgRow) -> Result<ListingRow, StoreError> {
    let column = |name: &str, e: sqlx::Error| StoreError::InvalidRow(format!("{}: {}", name, e));

    Ok(ListingRow {
        listing_id: row.try_get("listing_id").map_err(|e| column("listing_id", e))?,
        host_name: row.try_get("host_name").map_err(|e| column("host_name", e))?,
        latitude: row.try_get("latitude").map_err(|e| column("latitude", e))?,
        longitude: row.try_get("longitude").map_err(|e| column("longitude", e))?,
        price: row.try_get("price").map_err(|e| column("price", e))?,
        rating: row.try_get("rating").map_err(|e| column("rating", e))?,
    })
}

#[async_trait]
impl ListingStore for PostgresClient {
    async fn execute(&self, query: &ListingQuery) -> Result<Vec<ListingRow>, StoreError> {
        let rows = match query {
            ListingQuery::LocalHostRentals => {
                sqlx::query(LOCAL_HOST_RENTALS_SQL)
                    .fetch_all(&self.pool)
                    .await?
            }
            ListingQuery::ListingCoordinates { listing_id } => {
                sqlx::query(LISTING_COORDINATES_SQL)
                    .bind(*listing_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        tracing::debug!("{:?} returned {} rows", query, rows.len());

        rows.iter().map(listing_row).collect()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
