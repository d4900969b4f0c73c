use std::collections::HashMap;

use crate::models::{Candidate, DropReason, GeoPoint, ListingRow, Lodging};

/// Primary and fallback tags for a hotel's website
const WEBSITE_TAG: &str = "website";
const CONTACT_WEBSITE_TAG: &str = "contact:website";
const NAME_TAG: &str = "name";

/// Tally of candidates dropped during normalization, keyed by reason
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropStats {
    pub by_reason: HashMap<DropReason, usize>,
}

impl DropStats {
    pub fn record(&mut self, reason: DropReason) {
        *self.by_reason.entry(reason).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: DropStats) {
        for (reason, count) in other.by_reason {
            *self.by_reason.entry(reason).or_insert(0) += count;
        }
    }

    pub fn total(&self) -> usize {
        self.by_reason.values().sum()
    }

    pub fn count(&self, reason: &DropReason) -> usize {
        self.by_reason.get(reason).copied().unwrap_or(0)
    }
}

/// Convert a raw candidate into a [`Lodging`], or report why it is unusable
///
/// `listing_url_base` is prefixed to a rental row's identifier to form its
/// external reference.
pub fn normalize(candidate: Candidate, listing_url_base: &str) -> Result<Lodging, DropReason> {
    match candidate {
        Candidate::DatabaseRow(row) => normalize_row(row, listing_url_base),
        Candidate::MapPoint {
            latitude,
            longitude,
            tags,
        } => normalize_map_tags(latitude, longitude, tags),
        Candidate::MapAreaWithCenter { center, tags } => {
            normalize_map_tags(center.lat, center.lon, tags)
        }
        Candidate::MapAreaWithoutCenter { .. } => Err(DropReason::MissingCenter),
    }
}

/// Normalize a batch, skipping unusable candidates and counting why
pub fn normalize_all<I>(candidates: I, listing_url_base: &str) -> (Vec<Lodging>, DropStats)
where
    I: IntoIterator<Item = Candidate>,
{
    let mut stats = DropStats::default();

    let lodgings = candidates
        .into_iter()
        .filter_map(|candidate| match normalize(candidate, listing_url_base) {
            Ok(lodging) => Some(lodging),
            Err(reason) => {
                tracing::debug!("Dropping candidate: {}", reason);
                stats.record(reason);
                None
            }
        })
        .collect();

    (lodgings, stats)
}

fn normalize_row(row: ListingRow, listing_url_base: &str) -> Result<Lodging, DropReason> {
    let location = location_from(row.latitude, row.longitude)?;
    let name = non_blank(row.host_name).ok_or(DropReason::MissingName)?;

    Ok(Lodging {
        name,
        location,
        price: row.price,
        rating: row.rating,
        external_reference: row
            .listing_id
            .map(|id| format!("{}{}", listing_url_base, id)),
    })
}

fn normalize_map_tags(
    latitude: f64,
    longitude: f64,
    mut tags: HashMap<String, String>,
) -> Result<Lodging, DropReason> {
    let location = location_from(Some(latitude), Some(longitude))?;
    let name = non_blank(tags.remove(NAME_TAG)).ok_or(DropReason::MissingName)?;

    let website = non_blank(tags.remove(WEBSITE_TAG))
        .or_else(|| non_blank(tags.remove(CONTACT_WEBSITE_TAG)));

    // The map source carries neither price nor rating
    Ok(Lodging {
        name,
        location,
        price: None,
        rating: None,
        external_reference: website,
    })
}

fn location_from(latitude: Option<f64>, longitude: Option<f64>) -> Result<GeoPoint, DropReason> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok_or(DropReason::InvalidCoordinates),
        _ => Err(DropReason::MissingCoordinates),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
