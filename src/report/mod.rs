use crate::model::{CheapestByCountry, CheapestByPlace, CountryAggregate};

/// Standard median. `NaN` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Per-country median of the cheapest place totals.
///
/// Currency is taken from the first place; countries without places are left out.
pub fn aggregate_by_country(by_place: &CheapestByPlace) -> CheapestByCountry {
    by_place
        .iter()
        .filter_map(|(country, places)| {
            let currency = places.values().next()?.currency.clone();
            let totals: Vec<f64> = places.values().map(|p| p.total).collect();
            Some((
                country.clone(),
                CountryAggregate {
                    median_cheapest_week_total: median(&totals),
                    currency,
                    places: places.clone(),
                },
            ))
        })
        .collect()
}
