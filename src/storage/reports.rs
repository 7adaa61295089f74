use crate::model::{CheapestByPlace, StorageError};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const CSV_HEADER: [&str; 10] = [
    "country",
    "place",
    "check_in",
    "check_out",
    "hotel_name",
    "hotel_id",
    "offer_id",
    "total",
    "currency",
    "verified_at",
];

/// Pretty-printed JSON, overwriting any previous file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_cheapest_by_place(path: &Path) -> Result<CheapestByPlace, StorageError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// One row per place, absent optional fields written as empty cells.
pub fn write_csv_report(path: &Path, by_place: &CheapestByPlace) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for (country, places) in by_place {
        for (place, info) in places {
            let check_in = info.check_in.to_string();
            let check_out = info.check_out.to_string();
            let total = format_total(info.total);
            writer.write_record([
                country.as_str(),
                place.as_str(),
                check_in.as_str(),
                check_out.as_str(),
                info.hotel_name.as_deref().unwrap_or_default(),
                info.hotel_id.as_deref().unwrap_or_default(),
                info.offer_id.as_deref().unwrap_or_default(),
                total.as_str(),
                info.currency.as_str(),
                info.verified_at.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Whole totals keep one decimal (`1020.0`), others print as-is (`845.5`).
fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{total:.1}")
    } else {
        total.to_string()
    }
}
