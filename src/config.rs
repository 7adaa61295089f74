use crate::model::{ConfigError, Destination};
use crate::utils::weekday_from_index;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_HOST_TEST: &str = "https://test.api.amadeus.com";
const DEFAULT_HOST_PROD: &str = "https://api.amadeus.com";
/// Upper bounds enforced by `validate_config`.
pub const MAX_STAY_NIGHTS: u32 = 366;
pub const MAX_REFINE_WINDOW_DAYS: u32 = 366;
const DEFAULT_NOTES: &str = "Price for 2 adults; verify child policy before booking.";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host_test")]
    pub host_test: String,
    #[serde(default = "default_host_prod")]
    pub host_prod: String,
    #[serde(default = "default_sleep_ms")]
    pub sleep_between_calls_ms: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub year: i32,
    pub summer_months: Vec<u32>,
    pub length_of_stay_nights: u32,
    #[serde(default)]
    pub full_daily_scan: bool,
    /// Monday = 0 .. Sunday = 6
    #[serde(default)]
    pub coarse_days_of_week: Vec<u8>,
    pub refine_window_days: u32,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default = "default_room_quantity")]
    pub room_quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShortlistConfig {
    pub radius_km_default: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub ratings: Vec<u8>,
    pub max_hotels_per_place: usize,
    #[serde(default = "default_hotel_source")]
    pub hotel_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_notes")]
    pub notes: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            notes: default_notes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub shortlist: ShortlistConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ApiConfig {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.sleep_between_calls_ms)
    }

    pub fn host_for(&self, env: ApiEnvironment) -> &str {
        match env {
            ApiEnvironment::Test => &self.host_test,
            ApiEnvironment::Production => &self.host_prod,
        }
    }
}

/// One entry of the destinations file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub radius_km: Option<u32>,
}

/// country -> places, kept in file order
pub type DestinationsFile = IndexMap<String, Vec<PlaceConfig>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEnvironment {
    Test,
    Production,
}

impl ApiEnvironment {
    /// `test` selects the sandbox; any other value selects production.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("test") {
            ApiEnvironment::Test
        } else {
            ApiEnvironment::Production
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = read_file(path)?;
    let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_destinations(path: &Path, config: &AppConfig) -> Result<Vec<Destination>, ConfigError> {
    let content = read_file(path)?;
    let file: DestinationsFile = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })?;
    resolve_destinations(file, config.shortlist.radius_km_default)
}

pub fn resolve_destinations(
    file: DestinationsFile,
    radius_km_default: u32,
) -> Result<Vec<Destination>, ConfigError> {
    let mut issues = Vec::new();
    let mut destinations = Vec::new();

    for (country, places) in file {
        for place in places {
            if !(-90.0..=90.0).contains(&place.latitude) {
                issues.push(format!("{country}/{}: latitude out of range", place.name));
            }
            if !(-180.0..=180.0).contains(&place.longitude) {
                issues.push(format!("{country}/{}: longitude out of range", place.name));
            }
            // A zero radius is treated like a missing one.
            let radius_km = place
                .radius_km
                .filter(|r| *r > 0)
                .unwrap_or(radius_km_default);
            destinations.push(Destination {
                country: country.clone(),
                place: place.name,
                latitude: place.latitude,
                longitude: place.longitude,
                radius_km,
            });
        }
    }

    if issues.is_empty() {
        Ok(destinations)
    } else {
        Err(ConfigError::Invalid(issues))
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let mut issues: Vec<String> = Vec::new();
    let search = &config.search;

    if search.summer_months.is_empty() {
        issues.push("search.summer_months must contain at least one month".into());
    }
    if search.summer_months.iter().any(|m| !(1..=12).contains(m)) {
        issues.push("search.summer_months must be in 1..=12".into());
    }
    if search.summer_months.windows(2).any(|w| w[1] < w[0]) {
        issues.push("search.summer_months must be in calendar order".into());
    }
    if search.length_of_stay_nights == 0 {
        issues.push("search.length_of_stay_nights must be > 0".into());
    }
    if search.length_of_stay_nights > MAX_STAY_NIGHTS {
        issues.push(format!("search.length_of_stay_nights must be <= {MAX_STAY_NIGHTS}"));
    }
    if search.refine_window_days > MAX_REFINE_WINDOW_DAYS {
        issues.push(format!("search.refine_window_days must be <= {MAX_REFINE_WINDOW_DAYS}"));
    }
    if !search.full_daily_scan && search.coarse_days_of_week.is_empty() {
        issues.push("search.coarse_days_of_week is required when full_daily_scan is false".into());
    }
    if search
        .coarse_days_of_week
        .iter()
        .any(|d| weekday_from_index(*d).is_none())
    {
        issues.push("search.coarse_days_of_week must be in 0..=6 (Monday = 0)".into());
    }
    if search.adults == 0 {
        issues.push("search.adults must be > 0".into());
    }
    if search.room_quantity == 0 {
        issues.push("search.room_quantity must be > 0".into());
    }

    if config.api.batch_size == 0 {
        issues.push("api.batch_size must be > 0".into());
    }
    if config.api.timeout_secs == 0 {
        issues.push("api.timeout_secs must be > 0".into());
    }
    if config.shortlist.max_hotels_per_place == 0 {
        issues.push("shortlist.max_hotels_per_place must be > 0".into());
    }
    if config.shortlist.radius_km_default == 0 {
        issues.push("shortlist.radius_km_default must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(issues))
    }
}

/// Loads `.env` if present, then reads the environment selector.
pub fn load_environment() -> ApiEnvironment {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }
    std::env::var("AMADEUS_ENV")
        .map(|v| ApiEnvironment::from_name(&v))
        .unwrap_or(ApiEnvironment::Test)
}

pub fn load_credentials() -> Result<Credentials, ConfigError> {
    let client_id = non_empty_env("AMADEUS_CLIENT_ID")?;
    let client_secret = non_empty_env("AMADEUS_CLIENT_SECRET")?;
    Ok(Credentials {
        client_id,
        client_secret,
    })
}

fn non_empty_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn default_host_test() -> String {
    DEFAULT_HOST_TEST.to_string()
}

fn default_host_prod() -> String {
    DEFAULT_HOST_PROD.to_string()
}

fn default_sleep_ms() -> u64 {
    50
}

fn default_batch_size() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_adults() -> u32 {
    2
}

fn default_room_quantity() -> u32 {
    1
}

fn default_hotel_source() -> String {
    "ALL".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_notes() -> String {
    DEFAULT_NOTES.to_string()
}
