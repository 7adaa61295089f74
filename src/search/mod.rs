// Search module: date windows, per-date winners, coarse + refinement scan.

pub mod runner;
pub mod scan;
pub mod windows;

pub use runner::{place_result, run_search};
pub use scan::{PlaceScanner, PlaceSearch, ScanSettings, cheapest_quote};
pub use windows::{coarse_check_in_dates, refinement_dates};
