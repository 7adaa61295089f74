use crate::model::{ClientError, HotelListRequest, OfferSearchRequest};
use serde_json::Value;

/// Upstream hotel-pricing collaborator.
///
/// Both calls hand back the raw JSON body; `crate::parser` turns it into
/// domain values.
pub trait HotelApi {
    /// Hotels near a geocode. Any non-success status is an error.
    fn hotel_list_by_geocode(&self, req: &HotelListRequest) -> Result<Value, ClientError>;

    /// Offers for a batch of hotels on one check-in date.
    ///
    /// `Ok(None)` means the upstream had no usable answer for this call.
    /// Rate limiting and malformed requests are reported as
    /// `ClientError::RateLimited` and `ClientError::BadRequest`.
    fn hotel_search_offers(&self, req: &OfferSearchRequest) -> Result<Option<Value>, ClientError>;
}
