use crate::client::HotelApi;
use crate::config::AppConfig;
use crate::model::{AppError, BestQuote, DateWinner, Destination, OfferQuote, OfferSearchRequest};
use crate::parser::Parser;
use crate::search::windows::refinement_dates;
use crate::storage::WinnerLog;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Knobs of the per-place date scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub batch_size: usize,
    pub adults: u32,
    pub room_quantity: u32,
    pub refine_window_days: u32,
}

impl ScanSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            batch_size: cfg.api.batch_size,
            adults: cfg.search.adults,
            room_quantity: cfg.search.room_quantity,
            refine_window_days: cfg.search.refine_window_days,
        }
    }
}

/// Outcome of the coarse + refinement scan for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearch {
    pub coarse: BestQuote,
    pub best: BestQuote,
}

/// Lowest total wins; on equal totals the earlier quote is kept.
pub fn cheapest_quote<I>(quotes: I) -> Option<OfferQuote>
where
    I: IntoIterator<Item = OfferQuote>,
{
    quotes.into_iter().fold(None, |best, quote| match best {
        Some(b) if b.total <= quote.total => Some(b),
        _ => Some(quote),
    })
}

fn better_of(current: Option<BestQuote>, candidate: BestQuote) -> BestQuote {
    match current {
        Some(c) if c.quote.total <= candidate.quote.total => c,
        _ => candidate,
    }
}

/// Runs batched offer queries for one place.
pub struct PlaceScanner<'a, A, P> {
    api: &'a A,
    parser: &'a P,
    settings: &'a ScanSettings,
}

impl<'a, A: HotelApi, P: Parser> PlaceScanner<'a, A, P> {
    pub fn new(api: &'a A, parser: &'a P, settings: &'a ScanSettings) -> Self {
        Self {
            api,
            parser,
            settings,
        }
    }

    /// Cheapest quote across all batches for one check-in date.
    ///
    /// A batch without usable data is skipped; the remaining batches still count.
    pub fn date_winner(
        &self,
        destination: &Destination,
        hotel_ids: &[String],
        check_in: NaiveDate,
    ) -> Result<Option<OfferQuote>, AppError> {
        let mut quotes = Vec::new();
        for batch in hotel_ids.chunks(self.settings.batch_size.max(1)) {
            let request = OfferSearchRequest {
                hotel_ids: batch.to_vec(),
                check_in,
                adults: self.settings.adults,
                room_quantity: self.settings.room_quantity,
            };
            match self.api.hotel_search_offers(&request)? {
                Some(body) => quotes.extend(self.parser.parse_offers(&body)?),
                None => info!(
                    "No offers found for {} on {}; skipping.",
                    check_in, destination.place
                ),
            }
        }
        debug!("{} priced hotels on {}", quotes.len(), check_in);
        Ok(cheapest_quote(quotes))
    }

    fn scan<L, I>(
        &self,
        destination: &Destination,
        hotel_ids: &[String],
        dates: I,
        start: Option<BestQuote>,
        log: &mut L,
    ) -> Result<Option<BestQuote>, AppError>
    where
        L: WinnerLog,
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().try_fold(start, |best, check_in| {
            let Some(winner) = self.date_winner(destination, hotel_ids, check_in)? else {
                return Ok(best);
            };
            log.record(&DateWinner {
                country: destination.country.clone(),
                place: destination.place.clone(),
                check_in,
                winner: winner.clone(),
            })?;
            Ok(Some(better_of(
                best,
                BestQuote {
                    check_in,
                    quote: winner,
                },
            )))
        })
    }

    /// Coarse scan over `coarse_dates`, then a daily scan around the coarse winner.
    ///
    /// Returns `None` when the coarse scan never saw a priced offer.
    pub fn search_place<L: WinnerLog>(
        &self,
        destination: &Destination,
        hotel_ids: &[String],
        coarse_dates: &[NaiveDate],
        log: &mut L,
    ) -> Result<Option<PlaceSearch>, AppError> {
        let coarse = self.scan(
            destination,
            hotel_ids,
            coarse_dates.iter().copied(),
            None,
            log,
        )?;
        let Some(coarse) = coarse else {
            info!("No priced offers found in coarse scan; skipping refinement.");
            return Ok(None);
        };

        let window = refinement_dates(coarse.check_in, self.settings.refine_window_days)
            .ok_or_else(|| {
                AppError::DateOutOfRange(format!(
                    "refinement window of {} days around {}",
                    self.settings.refine_window_days, coarse.check_in
                ))
            })?;
        debug!(
            "Refining around {} ({} days)",
            coarse.check_in,
            window.len()
        );
        let best = self
            .scan(destination, hotel_ids, window, Some(coarse.clone()), log)?
            .unwrap_or_else(|| coarse.clone());

        Ok(Some(PlaceSearch { coarse, best }))
    }
}
