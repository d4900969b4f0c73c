use crate::models::{BoundingBox, GeoPoint};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude in kilometers
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// Symmetric in its arguments and zero for identical points.
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate a bounding box around a center point
///
/// Used only to narrow an upstream query, so the box is allowed to be
/// generous; exact filtering happens afterwards with [`haversine_distance`].
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// Near the poles cos(latitude) vanishes and the box spans every longitude.
/// Latitude and longitude are clamped to their valid ranges, so a box that
/// would cross the antimeridian is cut at ±180.
pub fn calculate_bounding_box(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let radius_km = radius_km.max(0.0);

    let lat_delta = radius_km / KM_PER_DEGREE;

    let lon_scale = center.latitude.to_radians().cos().abs();
    let lon_delta = if lon_scale < f64::EPSILON {
        180.0
    } else {
        (radius_km / (KM_PER_DEGREE * lon_scale)).min(180.0)
    };

    BoundingBox {
        min_lat: (center.latitude - lat_delta).max(-90.0),
        max_lat: (center.latitude + lat_delta).min(90.0),
        min_lon: (center.longitude - lon_delta).max(-180.0),
        max_lon: (center.longitude + lon_delta).min(180.0),
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: &GeoPoint, bbox: &BoundingBox) -> bool {
    point.latitude >= bbox.min_lat
        && point.latitude <= bbox.max_lat
        && point.longitude >= bbox.min_lon
        && point.longitude <= bbox.max_lon
}
