// Unit tests for Accommodation Advisor

use accommodation_advisor::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    normalize::{normalize, normalize_all},
    parse_listing_id, Ranker,
};
use accommodation_advisor::models::{
    Candidate, Direction, DropReason, GeoPoint, ListingRow, Lodging, MapCenter, MapElement,
};
use std::collections::HashMap;

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

fn lodging(name: &str, lat: f64, lon: f64, rating: Option<f64>) -> Lodging {
    Lodging {
        name: name.to_string(),
        location: point(lat, lon),
        price: None,
        rating,
        external_reference: None,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let savoy = point(51.5104, -0.1204);
    assert_eq!(haversine_distance(&savoy, &savoy), 0.0);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let manhattan = point(40.7580, -73.9855);
    let brooklyn = point(40.6782, -73.9442);

    let distance = haversine_distance(&manhattan, &brooklyn);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_haversine_never_exceeds_half_circumference() {
    let half_circumference = std::f64::consts::PI * 6371.0;
    for (a, b) in [
        (point(0.0, 0.0), point(0.0, 180.0)),
        (point(90.0, 0.0), point(-90.0, 0.0)),
        (point(45.0, 45.0), point(-45.0, -135.0)),
    ] {
        let d = haversine_distance(&a, &b);
        assert!(d.is_finite());
        assert!(d <= half_circumference + 1e-6);
    }
}

#[test]
fn test_bounding_box_creation() {
    let center = point(40.7128, -74.0060);
    let bbox = calculate_bounding_box(&center, 50.0);

    assert!(bbox.min_lat < center.latitude && center.latitude < bbox.max_lat);
    assert!(bbox.min_lon < center.longitude && center.longitude < bbox.max_lon);
    // Longitude degrees shrink away from the equator
    assert!(bbox.max_lon - bbox.min_lon > bbox.max_lat - bbox.min_lat);
}

#[test]
fn test_bounding_box_contains_radius_circle() {
    let center = point(-33.8688, 151.2093);
    let bbox = calculate_bounding_box(&center, 5.0);

    // Points 4.9 km away along each axis stay inside the box
    let dlat = 4.9 / 111.2;
    let dlon = 4.9 / (111.2 * center.latitude.to_radians().cos());
    for p in [
        point(center.latitude + dlat, center.longitude),
        point(center.latitude - dlat, center.longitude),
        point(center.latitude, center.longitude + dlon),
        point(center.latitude, center.longitude - dlon),
    ] {
        assert!(haversine_distance(&center, &p) <= 5.0);
        assert!(is_within_bounding_box(&p, &bbox));
    }
}

#[test]
fn test_bounding_box_stays_in_coordinate_range() {
    for center in [point(89.99, 10.0), point(-89.99, -10.0), point(0.0, 179.9), point(0.0, -179.9)] {
        let bbox = calculate_bounding_box(&center, 500.0);
        assert!(bbox.min_lat >= -90.0 && bbox.max_lat <= 90.0);
        assert!(bbox.min_lon >= -180.0 && bbox.max_lon <= 180.0);
        assert!(is_within_bounding_box(&center, &bbox));
    }
}

#[test]
fn test_point_within_bbox() {
    let bbox = calculate_bounding_box(&point(40.7128, -74.0060), 10.0);

    assert!(is_within_bounding_box(&point(40.7128, -74.0060), &bbox));
    assert!(is_within_bounding_box(&point(40.71, -74.0), &bbox));
    assert!(!is_within_bounding_box(&point(50.0, -80.0), &bbox));
    assert!(!is_within_bounding_box(&point(bbox.max_lat + 0.01, -74.0), &bbox));
}

#[test]
fn test_parse_listing_id_variants() {
    assert_eq!(parse_listing_id("https://www.airbnb.com/rooms/12345"), Some(12345));
    assert_eq!(parse_listing_id("https://www.airbnb.co.uk/rooms/987?adults=2"), Some(987));
    assert_eq!(parse_listing_id("/rooms/42/photos"), Some(42));
    assert_eq!(parse_listing_id("https://www.airbnb.com/rooms/plus/555"), None);
    assert_eq!(parse_listing_id("https://www.airbnb.com/users/show/1"), None);
    assert_eq!(parse_listing_id(""), None);
}

#[test]
fn test_map_elements_classify_into_candidates() {
    let tags: HashMap<String, String> = [("name".to_string(), "Inn".to_string())].into_iter().collect();
    let element = |element_type: &str, lat: Option<f64>, center: Option<MapCenter>| MapElement {
        element_type: element_type.to_string(),
        id: Some(1),
        lat,
        lon: lat.map(|_| 2.0),
        center,
        tags: tags.clone(),
    };

    assert!(matches!(
        Candidate::try_from(element("node", Some(1.0), None)),
        Ok(Candidate::MapPoint { .. })
    ));
    assert_eq!(
        Candidate::try_from(element("node", None, None)),
        Err(DropReason::MissingCoordinates)
    );
    assert!(matches!(
        Candidate::try_from(element("way", None, Some(MapCenter { lat: 1.0, lon: 2.0 }))),
        Ok(Candidate::MapAreaWithCenter { .. })
    ));
    assert!(matches!(
        Candidate::try_from(element("relation", None, None)),
        Ok(Candidate::MapAreaWithoutCenter { .. })
    ));
    assert!(matches!(
        Candidate::try_from(element("area", None, None)),
        Err(DropReason::UnsupportedElement(_))
    ));
}

#[test]
fn test_normalize_is_total_over_candidates() {
    let candidates = vec![
        Candidate::DatabaseRow(ListingRow::default()),
        Candidate::DatabaseRow(ListingRow {
            listing_id: Some(5),
            host_name: Some("Bea".to_string()),
            latitude: Some(10.0),
            longitude: Some(10.0),
            ..Default::default()
        }),
        Candidate::MapAreaWithoutCenter { tags: HashMap::new() },
        Candidate::MapPoint {
            latitude: f64::NAN,
            longitude: 0.0,
            tags: [("name".to_string(), "Ghost".to_string())].into_iter().collect(),
        },
    ];

    let outcomes: Vec<_> = candidates
        .iter()
        .cloned()
        .map(|c| normalize(c, "https://www.airbnb.com/rooms/"))
        .collect();
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);

    let (lodgings, drops) = normalize_all(candidates, "https://www.airbnb.com/rooms/");
    assert_eq!(lodgings.len(), 1);
    assert_eq!(lodgings[0].name, "Bea");
    assert_eq!(drops.total(), 3);
    assert_eq!(drops.count(&DropReason::InvalidCoordinates), 1);
}

#[test]
fn test_ranked_rentals_respect_radius_and_cap() {
    let origin = point(48.8566, 2.3522);
    let candidates: Vec<Lodging> = (0..30)
        .map(|i| lodging(&format!("r{}", i), 48.8566 + 0.002 * i as f64, 2.3522, Some((i % 5) as f64)))
        .collect();

    let ranked = Ranker::with_default_limits().rank(&origin, candidates, 3.0, Direction::RentalsNearHotel);

    assert!(ranked.len() <= 10);
    assert!(ranked.iter().all(|l| l.distance_km <= 3.0));
    for pair in ranked.windows(2) {
        let (a, b) = (pair[0].rating.unwrap(), pair[1].rating.unwrap());
        assert!(a > b || (a == b && pair[0].distance_km <= pair[1].distance_km));
    }
}

#[test]
fn test_ranked_hotels_are_distance_ordered() {
    let origin = point(35.6762, 139.6503);
    let candidates = vec![
        lodging("far", 35.70, 139.6503, None),
        lodging("near", 35.68, 139.6503, None),
        lodging("outside", 36.5, 139.6503, None),
        lodging("mid", 35.69, 139.6503, None),
    ];

    let ranked = Ranker::with_default_limits().rank(&origin, candidates, 10.0, Direction::HotelsNearRental);

    let names: Vec<_> = ranked.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["near", "mid", "far"]);
}
