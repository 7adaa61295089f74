use crate::client::traits::HotelApi;
use crate::config::Credentials;
use crate::model::{ClientError, HotelListRequest, OfferSearchRequest};

use reqwest::blocking::{Client, Response};
use reqwest::{IntoUrl, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const HOTELS_BY_GEOCODE_PATH: &str = "/v1/reference-data/locations/hotels/by-geocode";
const HOTEL_OFFERS_PATH: &str = "/v3/shopping/hotel-offers";
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_TTL_SECS: u64 = 1800;
const MAX_BODY_IN_ERROR: usize = 500;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Blocking client for the Amadeus self-service hotel APIs.
pub struct AmadeusClient {
    client: Client,
    host: String,
    credentials: Credentials,
    call_delay: Duration,
    token: RefCell<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(
        host: &str,
        credentials: Credentials,
        call_delay: Duration,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent("HotelSniperBot/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            credentials,
            call_delay,
            token: RefCell::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    fn access_token(&self) -> Result<String, ClientError> {
        if let Some(token) = self.token.borrow().as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting new access token");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&form)
            .send()
            .map_err(|e| ClientError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ClientError::Auth(format!("{status}: {}", body_excerpt(response))));
        }

        let payload: TokenResponse = response
            .json()
            .map_err(|e| ClientError::Auth(format!("invalid token response: {e}")))?;
        let ttl = Duration::from_secs(payload.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS));
        let token = CachedToken {
            value: payload.access_token,
            expires_at: Instant::now() + ttl,
        };
        let value = token.value.clone();
        *self.token.borrow_mut() = Some(token);
        Ok(value)
    }

    fn get<U: IntoUrl>(&self, url: U, query: &[(&str, String)]) -> Result<Response, ClientError> {
        let token = self.access_token()?;
        thread::sleep(self.call_delay);
        self.client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .map_err(|e| ClientError::Http(e.to_string()))
    }

    /// Full details of a single offer, used to re-check a price before booking.
    pub fn hotel_offer_details(&self, offer_id: &str) -> Result<Value, ClientError> {
        let response = self.get(offer_details_url(&self.host, offer_id)?, &[])?;
        if !response.status().is_success() {
            return Err(classify_failure(response));
        }
        decode_json(response)
    }
}

impl HotelApi for AmadeusClient {
    fn hotel_list_by_geocode(&self, req: &HotelListRequest) -> Result<Value, ClientError> {
        let query = hotel_list_query(req);
        let response = self.get(self.url(HOTELS_BY_GEOCODE_PATH), &query)?;
        if !response.status().is_success() {
            return Err(classify_failure(response));
        }
        decode_json(response)
    }

    fn hotel_search_offers(&self, req: &OfferSearchRequest) -> Result<Option<Value>, ClientError> {
        let query = offer_search_query(req);
        let response = self.get(self.url(HOTEL_OFFERS_PATH), &query)?;
        let status = response.status();
        match offer_search_outcome(status) {
            OfferOutcome::Offers => decode_json(response).map(Some),
            OfferOutcome::RateLimited => Err(ClientError::RateLimited),
            OfferOutcome::BadRequest => Err(ClientError::BadRequest(body_excerpt(response))),
            OfferOutcome::NoData => {
                warn!(
                    "Offer search for {} returned {}; treating as no data",
                    req.check_in, status
                );
                Ok(None)
            }
        }
    }
}

/// How the scan treats an offer-search status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OfferOutcome {
    Offers,
    NoData,
    RateLimited,
    BadRequest,
}

fn offer_search_outcome(status: StatusCode) -> OfferOutcome {
    if status.is_success() {
        return OfferOutcome::Offers;
    }
    match status.as_u16() {
        429 => OfferOutcome::RateLimited,
        400 => OfferOutcome::BadRequest,
        _ => OfferOutcome::NoData,
    }
}

/// Offer id goes in as a single percent-encoded path segment.
fn offer_details_url(host: &str, offer_id: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(&format!("{host}{HOTEL_OFFERS_PATH}"))
        .map_err(|e| ClientError::Http(format!("invalid host {host}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Http(format!("invalid host {host}")))?
        .push(offer_id);
    Ok(url)
}

pub(crate) fn hotel_list_query(req: &HotelListRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("latitude", req.latitude.to_string()),
        ("longitude", req.longitude.to_string()),
        ("radius", req.radius_km.to_string()),
        ("radiusUnit", "KM".to_string()),
    ];
    if !req.amenities.is_empty() {
        query.push(("amenities", req.amenities.join(",")));
    }
    if !req.ratings.is_empty() {
        let ratings: Vec<String> = req.ratings.iter().map(|r| r.to_string()).collect();
        query.push(("ratings", ratings.join(",")));
    }
    query.push(("hotelSource", req.hotel_source.clone()));
    query
}

pub(crate) fn offer_search_query(req: &OfferSearchRequest) -> Vec<(&'static str, String)> {
    vec![
        ("hotelIds", req.hotel_ids.join(",")),
        ("adults", req.adults.to_string()),
        ("checkInDate", req.check_in.format("%Y-%m-%d").to_string()),
        ("roomQuantity", req.room_quantity.to_string()),
    ]
}

fn classify_failure(response: Response) -> ClientError {
    let status = response.status();
    match status.as_u16() {
        401 | 403 => ClientError::Auth(format!("{status}: {}", body_excerpt(response))),
        429 => ClientError::RateLimited,
        400 => ClientError::BadRequest(body_excerpt(response)),
        _ => ClientError::Status {
            status: status.as_u16(),
            body: body_excerpt(response),
        },
    }
}

fn decode_json(response: Response) -> Result<Value, ClientError> {
    response
        .json::<Value>()
        .map_err(|e| ClientError::Decode(e.to_string()))
}

fn body_excerpt(response: Response) -> String {
    let body = response.text().unwrap_or_else(|_| "unknown".into());
    body.chars().take(MAX_BODY_IN_ERROR).collect()
}
