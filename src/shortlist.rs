use crate::client::HotelApi;
use crate::config::ShortlistConfig;
use crate::model::{AppError, Destination, HotelListRequest};
use crate::parser::Parser;
use std::collections::HashSet;
use tracing::info;

/// Hotels worth quoting around a destination: deduplicated, first-seen order, capped.
pub fn shortlist_hotels<A: HotelApi, P: Parser>(
    api: &A,
    parser: &P,
    destination: &Destination,
    cfg: &ShortlistConfig,
) -> Result<Vec<String>, AppError> {
    let request = HotelListRequest {
        latitude: destination.latitude,
        longitude: destination.longitude,
        radius_km: destination.radius_km,
        amenities: cfg.amenities.clone(),
        ratings: cfg.ratings.clone(),
        hotel_source: cfg.hotel_source.clone(),
    };
    let body = api.hotel_list_by_geocode(&request)?;
    let ids = parser.parse_hotel_ids(&body)?;
    let shortlisted = dedupe_and_cap(ids, cfg.max_hotels_per_place);
    info!("Shortlisted {} hotels", shortlisted.len());
    Ok(shortlisted)
}

pub fn dedupe_and_cap(ids: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .take(cap)
        .collect()
}
