use crate::config::SearchConfig;
use crate::utils::{days_inclusive, last_day_of_month, weekday_index};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// First and last admissible check-in of the season.
///
/// The last check-in leaves room for the whole stay inside the last month.
pub fn season_bounds(year: i32, months: &[u32], nights: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first_month = *months.first()?;
    let last_month = *months.last()?;
    let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
    let last_day = last_day_of_month(year, last_month)?;
    let end = last_day.checked_sub_signed(Duration::days(i64::from(nights.saturating_sub(1))))?;
    Some((start, end))
}

/// Candidate check-in dates for the coarse scan, in calendar order.
pub fn coarse_check_in_dates(search: &SearchConfig) -> Vec<NaiveDate> {
    let Some((start, end)) = season_bounds(
        search.year,
        &search.summer_months,
        search.length_of_stay_nights,
    ) else {
        return Vec::new();
    };

    if search.full_daily_scan {
        return days_inclusive(start, end).collect();
    }

    let allowed: HashSet<u8> = search.coarse_days_of_week.iter().copied().collect();
    days_inclusive(start, end)
        .filter(|d| allowed.contains(&weekday_index(*d)))
        .collect()
}

/// Every day in `center - days ..= center + days`, or `None` if either edge
/// leaves the supported calendar.
pub fn refinement_dates(center: NaiveDate, days: u32) -> Option<Vec<NaiveDate>> {
    let span = Duration::days(i64::from(days));
    let first = center.checked_sub_signed(span)?;
    let last = center.checked_add_signed(span)?;
    Some(days_inclusive(first, last).collect())
}
