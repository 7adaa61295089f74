mod common;

use chrono::Duration;
use common::{DateScript, ScriptedApi, config, d, split};
use hotel_sniper::model::{AppError, ClientError, DateWinner};
use hotel_sniper::parser::AmadeusParser;
use hotel_sniper::search::{PlaceScanner, ScanSettings, run_search};

const VERIFIED_AT: &str = "2025-05-01T09:30:00+02:00";

fn scenario_api() -> ScriptedApi {
    // A = Jun 2 (no data), B = Jun 5, C = Jun 7 (unpriced), D = Jun 9
    ScriptedApi::new(&["H1", "H2", "H1", "H3"])
        .on(d(2025, 6, 2), DateScript::NoData)
        .on(d(2025, 6, 5), DateScript::Prices(vec![("H1", 200.0), ("H3", 150.0)]))
        .on(d(2025, 6, 7), DateScript::Unpriced)
        .on(d(2025, 6, 9), DateScript::Prices(vec![("H2", 120.0), ("H3", 180.0)]))
        .on(d(2025, 6, 8), DateScript::Prices(vec![("H1", 130.0)]))
        .on(d(2025, 6, 10), DateScript::Prices(vec![("H2", 115.0), ("H1", 119.0)]))
}

fn coarse_dates() -> Vec<chrono::NaiveDate> {
    vec![d(2025, 6, 2), d(2025, 6, 5), d(2025, 6, 7), d(2025, 6, 9)]
}

#[test]
fn coarse_winner_is_refined_to_cheaper_neighbour() {
    let api = scenario_api();
    let parser = AmadeusParser::new();
    let cfg = config(7, 1, 2);
    let mut log: Vec<DateWinner> = Vec::new();

    let by_place = run_search(
        &api,
        &parser,
        &cfg,
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap();

    let result = &by_place["Croatia"]["Split"];
    assert_eq!(result.total, 115.0);
    assert_eq!(result.check_in, d(2025, 6, 10));
    assert_eq!(result.check_out, d(2025, 6, 17));
    assert_eq!(result.hotel_id.as_deref(), Some("H2"));
    assert_eq!(result.hotel_name.as_deref(), Some("Hotel H2"));
    assert_eq!(result.offer_id.as_deref(), Some("H2-2025-06-10"));
    assert_eq!(result.currency, "EUR");
    assert_eq!(result.verified_at, VERIFIED_AT);
    assert_eq!(result.notes, "test run");

    // B and D from the coarse scan, then Jun 8, 9 (again) and 10 from refinement
    let logged: Vec<_> = log.iter().map(|w| (w.check_in, w.winner.total)).collect();
    assert_eq!(
        logged,
        vec![
            (d(2025, 6, 5), 150.0),
            (d(2025, 6, 9), 120.0),
            (d(2025, 6, 8), 130.0),
            (d(2025, 6, 9), 120.0),
            (d(2025, 6, 10), 115.0),
        ]
    );
    assert!(log.iter().all(|w| w.country == "Croatia" && w.place == "Split"));
}

#[test]
fn coarse_scan_alone_picks_date_d() {
    let api = scenario_api();
    let parser = AmadeusParser::new();
    let settings = ScanSettings {
        batch_size: 2,
        adults: 2,
        room_quantity: 1,
        refine_window_days: 1,
    };
    let scanner = PlaceScanner::new(&api, &parser, &settings);
    let hotel_ids: Vec<String> = ["H1", "H2", "H3"].iter().map(|s| s.to_string()).collect();
    let mut log: Vec<DateWinner> = Vec::new();

    let found = scanner
        .search_place(&split(), &hotel_ids, &coarse_dates(), &mut log)
        .unwrap()
        .unwrap();

    assert_eq!(found.coarse.check_in, d(2025, 6, 9));
    assert_eq!(found.coarse.quote.total, 120.0);
    assert!(found.best.quote.total <= found.coarse.quote.total);
}

#[test]
fn hotels_are_batched_and_shortlist_is_deduplicated() {
    let api = scenario_api();
    let cfg = config(7, 1, 2);
    let mut log: Vec<DateWinner> = Vec::new();

    run_search(
        &api,
        &AmadeusParser::new(),
        &cfg,
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap();

    let calls = api.offer_calls.borrow();
    // 4 coarse dates + 3 refinement dates, two batches each
    assert_eq!(calls.len(), 14);
    assert_eq!(calls[0].hotel_ids, vec!["H1", "H2"]);
    assert_eq!(calls[1].hotel_ids, vec!["H3"]);
    assert!(calls.iter().all(|c| c.adults == 2 && c.room_quantity == 1));
    assert_eq!(
        api.queried_dates(),
        vec![
            d(2025, 6, 2),
            d(2025, 6, 5),
            d(2025, 6, 7),
            d(2025, 6, 9),
            d(2025, 6, 8),
            d(2025, 6, 10),
        ]
    );
}

#[test]
fn refinement_never_worsens_the_coarse_answer() {
    let parser = AmadeusParser::new();
    let settings = ScanSettings {
        batch_size: 5,
        adults: 2,
        room_quantity: 1,
        refine_window_days: 2,
    };
    let hotel_ids = vec!["H1".to_string(), "H2".to_string()];
    let neighbours = [400.0, 90.0, 250.0, 100.0];

    for (i, neighbour_total) in neighbours.iter().enumerate() {
        let api = ScriptedApi::new(&["H1", "H2"])
            .on(d(2025, 7, 10), DateScript::Prices(vec![("H1", 100.0), ("H2", 140.0)]))
            .on(d(2025, 7, 8 + i as u32 % 2), DateScript::Prices(vec![("H2", *neighbour_total)]))
            .on(d(2025, 7, 12), DateScript::Prices(vec![("H1", 300.0)]));
        let scanner = PlaceScanner::new(&api, &parser, &settings);
        let mut log: Vec<DateWinner> = Vec::new();

        let found = scanner
            .search_place(&split(), &hotel_ids, &[d(2025, 7, 10)], &mut log)
            .unwrap()
            .unwrap();

        assert!(found.best.quote.total <= found.coarse.quote.total);
        let expected = neighbour_total.min(100.0);
        assert_eq!(found.best.quote.total, expected);
        if *neighbour_total >= 100.0 {
            // equal totals keep the coarse winner
            assert_eq!(found.best, found.coarse);
        }
    }
}

#[test]
fn place_without_hotels_is_skipped() {
    let api = ScriptedApi::new(&[]);
    let mut log: Vec<DateWinner> = Vec::new();

    let by_place = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 3, 20),
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap();

    assert!(by_place.is_empty());
    assert_eq!(*api.list_calls.borrow(), 1);
    assert!(api.offer_calls.borrow().is_empty());
    assert!(log.is_empty());
}

#[test]
fn place_without_priced_offers_skips_refinement() {
    let api = ScriptedApi::new(&["H1", "H2"])
        .on(d(2025, 6, 5), DateScript::Unpriced);
    let mut log: Vec<DateWinner> = Vec::new();

    let by_place = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 3, 20),
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap();

    assert!(by_place.is_empty());
    assert!(log.is_empty());
    // one batch per coarse date, nothing more
    assert_eq!(api.offer_calls.borrow().len(), 4);
}

#[test]
fn later_places_still_run_after_a_skipped_one() {
    let api = ScriptedApi::new(&["H1"]).on(d(2025, 6, 5), DateScript::Prices(vec![("H1", 610.0)]));
    let mut hvar = split();
    hvar.place = "Hvar".into();
    let mut log: Vec<DateWinner> = Vec::new();

    let by_place = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 0, 20),
        &[split(), hvar],
        &[d(2025, 6, 5)],
        VERIFIED_AT,
        &mut log,
    )
    .unwrap();

    let croatia = &by_place["Croatia"];
    assert_eq!(croatia.len(), 2);
    assert_eq!(croatia["Hvar"].total, 610.0);
    assert_eq!(*api.list_calls.borrow(), 2);
}

#[test]
fn rate_limit_aborts_the_run() {
    let api = ScriptedApi::new(&["H1"])
        .on(d(2025, 6, 5), DateScript::Prices(vec![("H1", 150.0)]))
        .on(d(2025, 6, 7), DateScript::RateLimited);
    let mut log: Vec<DateWinner> = Vec::new();

    let err = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 1, 20),
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Client(ClientError::RateLimited)));
    // Jun 2, 5 and 7; Jun 9 is never reached
    assert_eq!(api.offer_calls.borrow().len(), 3);
}

#[test]
fn bad_request_aborts_the_run() {
    let api = ScriptedApi::new(&["H1"]).on(d(2025, 6, 2), DateScript::BadRequest);
    let mut log: Vec<DateWinner> = Vec::new();

    let err = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 1, 20),
        &[split()],
        &coarse_dates(),
        VERIFIED_AT,
        &mut log,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Client(ClientError::BadRequest(_))));
}

#[test]
fn oversized_refinement_window_is_an_error() {
    let api = ScriptedApi::new(&["H1"]).on(d(2025, 6, 5), DateScript::Prices(vec![("H1", 150.0)]));
    let mut log: Vec<DateWinner> = Vec::new();

    let err = run_search(
        &api,
        &AmadeusParser::new(),
        &config(7, 4_000_000_000, 20),
        &[split()],
        &[d(2025, 6, 5)],
        VERIFIED_AT,
        &mut log,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::DateOutOfRange(_)));
    // the coarse date was still scanned and logged
    assert_eq!(log.len(), 1);
}

#[test]
fn check_out_tracks_length_of_stay() {
    for nights in [1u32, 3, 5, 7, 10, 14] {
        let api = ScriptedApi::new(&["H1", "H2"])
            .on(d(2025, 6, 9), DateScript::Prices(vec![("H1", 500.0), ("H2", 480.0)]));
        let mut log: Vec<DateWinner> = Vec::new();

        let by_place = run_search(
            &api,
            &AmadeusParser::new(),
            &config(nights, 1, 20),
            &[split()],
            &coarse_dates(),
            VERIFIED_AT,
            &mut log,
        )
        .unwrap();

        let result = &by_place["Croatia"]["Split"];
        assert_eq!(result.check_in, d(2025, 6, 9));
        assert_eq!(
            result.check_out,
            result.check_in + Duration::days(i64::from(nights))
        );
    }
}
