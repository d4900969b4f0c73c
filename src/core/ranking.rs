use std::cmp::Ordering;

use crate::core::distance::haversine_distance;
use crate::models::{Direction, GeoPoint, Listing, Lodging, RankedResult, ResultLimits};

/// Proximity filter and ranker
///
/// # Pipeline
/// 1. Attach the Haversine distance from the origin to every candidate
/// 2. Keep candidates with `distance_km <= radius_km`
/// 3. Sort by distance ascending
/// 4. For rentals, stable-sort by rating (rated first, highest first), so
///    equal ratings stay in distance order
/// 5. Truncate to the direction's limit, if any
#[derive(Debug, Clone)]
pub struct Ranker {
    limits: ResultLimits,
}

impl Ranker {
    pub fn new(limits: ResultLimits) -> Self {
        Self { limits }
    }

    pub fn with_default_limits() -> Self {
        Self {
            limits: ResultLimits::default(),
        }
    }

    pub fn limits(&self) -> ResultLimits {
        self.limits
    }

    /// Filter and order `candidates` around `origin`
    ///
    /// A negative or NaN radius is treated as zero, which keeps only
    /// candidates located exactly at the origin.
    pub fn rank(
        &self,
        origin: &GeoPoint,
        candidates: Vec<Lodging>,
        radius_km: f64,
        direction: Direction,
    ) -> RankedResult {
        let radius_km = radius_km.max(0.0);

        let mut ranked: Vec<Listing> = candidates
            .into_iter()
            .map(|lodging| {
                let distance_km = haversine_distance(origin, &lodging.location);
                Listing::from_lodging(lodging, distance_km)
            })
            .filter(|listing| listing.distance_km <= radius_km)
            .collect();

        ranked.sort_by(compare_by_distance);

        if direction == Direction::RentalsNearHotel {
            // sort_by is stable: rating ties keep their distance order
            ranked.sort_by(compare_by_rating);
        }

        if let Some(limit) = self.limits.for_direction(direction) {
            ranked.truncate(limit);
        }

        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_limits()
    }
}

#[inline]
fn compare_by_distance(a: &Listing, b: &Listing) -> Ordering {
    a.distance_km.total_cmp(&b.distance_km)
}

/// Rated listings first, then rating descending
#[inline]
fn compare_by_rating(a: &Listing, b: &Listing) -> Ordering {
    b.has_rating()
        .cmp(&a.has_rating())
        .then_with(|| match (a.rating, b.rating) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            _ => Ordering::Equal,
        })
}
