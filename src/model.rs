// Core structs: Destination, OfferQuote, PlaceResult, CountryAggregate
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A place to search around, resolved from the destinations file.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub country: String,
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: u32,
}

/// Hotel-list query for one destination.
#[derive(Debug, Clone)]
pub struct HotelListRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: u32,
    pub amenities: Vec<String>,
    pub ratings: Vec<u8>,
    pub hotel_source: String,
}

/// Offer-search query for one batch of hotels on one check-in date.
#[derive(Debug, Clone)]
pub struct OfferSearchRequest {
    pub hotel_ids: Vec<String>,
    pub check_in: NaiveDate,
    pub adults: u32,
    pub room_quantity: u32,
}

/// Cheapest priced offer of a single hotel on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferQuote {
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub offer_id: Option<String>,
    pub total: f64,
    pub currency: String,
}

/// Diagnostic record: the winning quote of one scanned date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWinner {
    pub country: String,
    pub place: String,
    pub check_in: NaiveDate,
    pub winner: OfferQuote,
}

/// Best quote seen so far while scanning a place.
#[derive(Debug, Clone, PartialEq)]
pub struct BestQuote {
    pub check_in: NaiveDate,
    pub quote: OfferQuote,
}

/// Cheapest verified stay for one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub offer_id: Option<String>,
    pub total: f64,
    pub currency: String,
    pub verified_at: String,
    #[serde(default)]
    pub notes: String,
}

/// country -> place -> result, in destinations-file order
pub type CheapestByPlace = IndexMap<String, IndexMap<String, PlaceResult>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAggregate {
    pub median_cheapest_week_total: f64,
    pub currency: String,
    pub places: IndexMap<String, PlaceResult>,
}

pub type CheapestByCountry = IndexMap<String, CountryAggregate>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limit exceeded, try again later")]
    RateLimited,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("http error: {0}")]
    Http(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid config:\n - {}", .0.join("\n - "))]
    Invalid(Vec<String>),
    #[error("environment variable {0} is required")]
    MissingEnv(&'static str),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}
