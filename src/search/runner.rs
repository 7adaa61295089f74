use crate::client::HotelApi;
use crate::config::AppConfig;
use crate::model::{AppError, BestQuote, CheapestByPlace, Destination, PlaceResult};
use crate::parser::Parser;
use crate::search::scan::{PlaceScanner, ScanSettings};
use crate::shortlist::shortlist_hotels;
use crate::storage::WinnerLog;
use crate::utils::add_nights;
use chrono::NaiveDate;
use tracing::info;

/// Searches every destination in order and collects the cheapest stay per place.
///
/// Places without hotels or without any priced offer are absent from the result.
pub fn run_search<A, P, L>(
    api: &A,
    parser: &P,
    config: &AppConfig,
    destinations: &[Destination],
    coarse_dates: &[NaiveDate],
    verified_at: &str,
    log: &mut L,
) -> Result<CheapestByPlace, AppError>
where
    A: HotelApi,
    P: Parser,
    L: WinnerLog,
{
    let settings = ScanSettings::from_config(config);
    let run = SearchRun {
        api,
        parser,
        scanner: PlaceScanner::new(api, parser, &settings),
        config,
        coarse_dates,
        verified_at,
    };

    destinations
        .iter()
        .try_fold(CheapestByPlace::new(), |acc, destination| {
            run.search_destination(destination, log, acc)
        })
}

/// Everything shared by the destinations of one run.
struct SearchRun<'a, A, P> {
    api: &'a A,
    parser: &'a P,
    scanner: PlaceScanner<'a, A, P>,
    config: &'a AppConfig,
    coarse_dates: &'a [NaiveDate],
    verified_at: &'a str,
}

impl<A: HotelApi, P: Parser> SearchRun<'_, A, P> {
    fn search_destination<L: WinnerLog>(
        &self,
        destination: &Destination,
        log: &mut L,
        mut acc: CheapestByPlace,
    ) -> Result<CheapestByPlace, AppError> {
        info!("=== {} – {} ===", destination.country, destination.place);

        let hotel_ids = shortlist_hotels(self.api, self.parser, destination, &self.config.shortlist)?;
        if hotel_ids.is_empty() {
            info!("No hotels found for this place; skipping.");
            return Ok(acc);
        }

        let Some(found) = self
            .scanner
            .search_place(destination, &hotel_ids, self.coarse_dates, log)?
        else {
            return Ok(acc);
        };

        let result = place_result(
            &found.best,
            self.config.search.length_of_stay_nights,
            self.verified_at,
            &self.config.output.notes,
        )?;
        info!(
            "Cheapest: {} → {} | {} ({}) | {} {}",
            result.check_in,
            result.check_out,
            result.hotel_name.as_deref().unwrap_or("?"),
            result.hotel_id.as_deref().unwrap_or("?"),
            result.total,
            result.currency
        );

        acc.entry(destination.country.clone())
            .or_default()
            .insert(destination.place.clone(), result);
        Ok(acc)
    }
}

pub fn place_result(
    best: &BestQuote,
    nights: u32,
    verified_at: &str,
    notes: &str,
) -> Result<PlaceResult, AppError> {
    let check_out = add_nights(best.check_in, nights).ok_or_else(|| {
        AppError::DateOutOfRange(format!("{} plus {} nights", best.check_in, nights))
    })?;
    Ok(PlaceResult {
        check_in: best.check_in,
        check_out,
        hotel_id: best.quote.hotel_id.clone(),
        hotel_name: best.quote.hotel_name.clone(),
        offer_id: best.quote.offer_id.clone(),
        total: best.quote.total,
        currency: best.quote.currency.clone(),
        verified_at: verified_at.to_string(),
        notes: notes.to_string(),
    })
}
