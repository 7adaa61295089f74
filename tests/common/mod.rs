#![allow(dead_code)]

use chrono::NaiveDate;
use hotel_sniper::client::HotelApi;
use hotel_sniper::config::AppConfig;
use hotel_sniper::model::{ClientError, Destination, HotelListRequest, OfferSearchRequest};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn config(nights: u32, refine_window_days: u32, batch_size: usize) -> AppConfig {
    serde_yaml::from_str(&format!(
        r#"
api:
  sleep_between_calls_ms: 0
  batch_size: {batch_size}
search:
  year: 2025
  summer_months: [6, 7, 8]
  length_of_stay_nights: {nights}
  full_daily_scan: false
  coarse_days_of_week: [0, 3, 5]
  refine_window_days: {refine_window_days}
shortlist:
  radius_km_default: 10
  amenities: [SWIMMING_POOL]
  ratings: [4, 5]
  max_hotels_per_place: 3
output:
  notes: test run
"#
    ))
    .unwrap()
}

pub fn split() -> Destination {
    Destination {
        country: "Croatia".into(),
        place: "Split".into(),
        latitude: 43.5081,
        longitude: 16.4402,
        radius_km: 10,
    }
}

/// What the fake upstream answers for one check-in date.
#[derive(Debug, Clone)]
pub enum DateScript {
    /// Upstream signals "no data" for every batch.
    NoData,
    /// Hotels answer, but none of their offers carries a price.
    Unpriced,
    /// hotel id -> total
    Prices(Vec<(&'static str, f64)>),
    RateLimited,
    BadRequest,
}

#[derive(Default)]
pub struct ScriptedApi {
    pub hotels: Vec<&'static str>,
    pub dates: HashMap<NaiveDate, DateScript>,
    pub offer_calls: RefCell<Vec<OfferSearchRequest>>,
    pub list_calls: RefCell<usize>,
}

impl ScriptedApi {
    pub fn new(hotels: &[&'static str]) -> Self {
        Self {
            hotels: hotels.to_vec(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate, script: DateScript) -> Self {
        self.dates.insert(date, script);
        self
    }

    pub fn queried_dates(&self) -> Vec<NaiveDate> {
        let mut seen = HashSet::new();
        self.offer_calls
            .borrow()
            .iter()
            .map(|r| r.check_in)
            .filter(|d| seen.insert(*d))
            .collect()
    }
}

impl HotelApi for ScriptedApi {
    fn hotel_list_by_geocode(&self, _req: &HotelListRequest) -> Result<Value, ClientError> {
        *self.list_calls.borrow_mut() += 1;
        let data: Vec<Value> = self
            .hotels
            .iter()
            .map(|id| json!({"hotelId": id, "name": format!("Hotel {id}")}))
            .collect();
        Ok(json!({ "data": data }))
    }

    fn hotel_search_offers(&self, req: &OfferSearchRequest) -> Result<Option<Value>, ClientError> {
        self.offer_calls.borrow_mut().push(req.clone());
        let script = self
            .dates
            .get(&req.check_in)
            .cloned()
            .unwrap_or(DateScript::NoData);

        let data: Vec<Value> = match script {
            DateScript::NoData => return Ok(None),
            DateScript::RateLimited => return Err(ClientError::RateLimited),
            DateScript::BadRequest => return Err(ClientError::BadRequest("checkInDate".into())),
            DateScript::Unpriced => req
                .hotel_ids
                .iter()
                .map(|id| {
                    json!({
                        "hotel": {"hotelId": id, "name": format!("Hotel {id}")},
                        "offers": [{"id": format!("{id}-x"), "price": {"currency": "EUR"}}]
                    })
                })
                .collect(),
            DateScript::Prices(prices) => prices
                .iter()
                .filter(|(id, _)| req.hotel_ids.iter().any(|h| h == id))
                .map(|(id, total)| {
                    json!({
                        "hotel": {"hotelId": id, "name": format!("Hotel {id}")},
                        "offers": [
                            {"id": format!("{id}-{}", req.check_in), "price": {"total": format!("{total:.2}"), "currency": "EUR"}},
                            {"id": format!("{id}-upsell"), "price": {"total": format!("{:.2}", total + 50.0), "currency": "EUR"}}
                        ]
                    })
                })
                .collect(),
        };
        Ok(Some(json!({ "data": data })))
    }
}
