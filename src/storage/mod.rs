pub mod quote_log;
pub mod reports;

pub use quote_log::{QuoteLog, WinnerLog};

use crate::model::{CheapestByCountry, CheapestByPlace, StorageError};
use crate::report::aggregate_by_country;
use std::path::{Path, PathBuf};

/// Locations of every file a run produces.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub raw_quotes: PathBuf,
    pub by_place: PathBuf,
    pub by_country: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            raw_quotes: dir.join("raw_quotes.jsonl"),
            by_place: dir.join("cheapest_by_place.json"),
            by_country: dir.join("cheapest_by_country.json"),
            csv: dir.join("report.csv"),
        }
    }
}

/// Writes the country aggregate and the CSV report derived from `by_place`.
pub fn write_reports(
    paths: &OutputPaths,
    by_place: &CheapestByPlace,
) -> Result<CheapestByCountry, StorageError> {
    let by_country = aggregate_by_country(by_place);
    reports::write_json(&paths.by_country, &by_country)?;
    reports::write_csv_report(&paths.csv, by_place)?;
    Ok(by_country)
}
