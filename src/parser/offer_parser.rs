// Amadeus-specific JSON extraction
use crate::model::{OfferQuote, ParserError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct HotelListBody {
    #[serde(default)]
    data: Option<Vec<HotelListItem>>,
}

#[derive(Debug, Deserialize)]
struct HotelListItem {
    #[serde(rename = "hotelId", default)]
    hotel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferSearchBody {
    #[serde(default)]
    data: Option<Vec<HotelOffers>>,
}

#[derive(Debug, Deserialize)]
struct HotelOffers {
    #[serde(default)]
    hotel: Option<HotelInfo>,
    #[serde(default)]
    offers: Option<Vec<RawOffer>>,
}

#[derive(Debug, Deserialize)]
struct HotelInfo {
    #[serde(rename = "hotelId", default)]
    hotel_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(default)]
    total: Option<Amount>,
    #[serde(default)]
    currency: Option<String>,
}

/// Totals come back as decimal strings, occasionally as plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn value(&self) -> Option<f64> {
        let parsed = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        parsed.is_finite().then_some(parsed)
    }
}

pub trait Parser {
    /// Hotel ids in response order. Records without an id are dropped.
    fn parse_hotel_ids(&self, body: &Value) -> Result<Vec<String>, ParserError>;

    /// One quote per hotel: its cheapest priced offer. Hotels without a
    /// priced offer are left out.
    fn parse_offers(&self, body: &Value) -> Result<Vec<OfferQuote>, ParserError>;
}

pub struct AmadeusParser;

impl AmadeusParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmadeusParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for AmadeusParser {
    fn parse_hotel_ids(&self, body: &Value) -> Result<Vec<String>, ParserError> {
        let parsed: HotelListBody = from_value(body, "hotel list response")?;
        Ok(parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|h| h.hotel_id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    fn parse_offers(&self, body: &Value) -> Result<Vec<OfferQuote>, ParserError> {
        let parsed: OfferSearchBody = from_value(body, "hotel offers response")?;
        let mut quotes = Vec::new();

        for hotel in parsed.data.unwrap_or_default() {
            let (hotel_id, hotel_name) = match hotel.hotel {
                Some(info) => (info.hotel_id, info.name),
                None => (None, None),
            };

            let mut best: Option<(f64, String, Option<String>)> = None;
            for offer in hotel.offers.unwrap_or_default() {
                let Some((total, currency)) = offer_price(&offer) else {
                    continue;
                };
                if best.as_ref().is_none_or(|(t, _, _)| total < *t) {
                    best = Some((total, currency, offer.id));
                }
            }

            if let Some((total, currency, offer_id)) = best {
                quotes.push(OfferQuote {
                    hotel_id,
                    hotel_name,
                    offer_id,
                    total,
                    currency,
                });
            }
        }

        Ok(quotes)
    }
}

fn offer_price(offer: &RawOffer) -> Option<(f64, String)> {
    let price = offer.price.as_ref()?;
    let total = price.total.as_ref()?.value()?;
    let currency = price.currency.clone()?;
    Some((total, currency))
}

fn from_value<T: DeserializeOwned>(body: &Value, what: &'static str) -> Result<T, ParserError> {
    T::deserialize(body).map_err(|e| ParserError::Malformed {
        what,
        reason: e.to_string(),
    })
}
