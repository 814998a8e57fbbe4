//! Calendar helpers for the monthly payroll.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{HrError, HrResult};

/// Returns the first day of a month, or a validation error when `month` is
/// outside 1-12 or the year is out of range.
fn first_of_month(month: u32, year: i32) -> HrResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(HrError::validation(
            "month",
            format!("month must be between 1 and 12, got {}", month),
        ));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| HrError::validation("year", format!("year {} is out of range", year)))
}

/// Number of days in the month.
pub fn days_in_month(month: u32, year: i32) -> HrResult<u32> {
    let first = first_of_month(month, year)?;
    Ok(first
        .iter_days()
        .take_while(|day| day.month() == month)
        .count() as u32)
}

/// Counts the days of the month that are not Sundays.
///
/// # Example
///
/// ```
/// use hr_admin::payroll::standard_working_days;
///
/// // April 2024: 30 days, 5 Sundays.
/// assert_eq!(standard_working_days(4, 2024).unwrap(), 25);
/// ```
pub fn standard_working_days(month: u32, year: i32) -> HrResult<u32> {
    let first = first_of_month(month, year)?;
    Ok(first
        .iter_days()
        .take_while(|day| day.month() == month)
        .filter(|day| day.weekday() != Weekday::Sun)
        .count() as u32)
}

/// The calendar month before the one containing `today`.
pub fn previous_month(today: NaiveDate) -> (u32, i32) {
    match today.month() {
        1 => (12, today.year() - 1),
        m => (m - 1, today.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_april_2024_has_25_working_days() {
        assert_eq!(days_in_month(4, 2024).unwrap(), 30);
        assert_eq!(standard_working_days(4, 2024).unwrap(), 25);
    }

    #[test]
    fn test_leap_february() {
        assert_eq!(days_in_month(2, 2024).unwrap(), 29);
        assert_eq!(days_in_month(2, 2023).unwrap(), 28);
        // February 2024 has 4 Sundays.
        assert_eq!(standard_working_days(2, 2024).unwrap(), 25);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        for month in [0, 13] {
            assert!(matches!(
                standard_working_days(month, 2024),
                Err(HrError::Validation { ref field, .. }) if field == "month"
            ));
        }
    }

    #[test]
    fn test_previous_month_wraps_year() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(previous_month(jan), (12, 2024));
        let may = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(previous_month(may), (4, 2024));
    }

    proptest! {
        #[test]
        fn prop_working_days_exclude_only_sundays(month in 1u32..=12, year in 1970i32..2100) {
            let days = days_in_month(month, year).unwrap();
            let working = standard_working_days(month, year).unwrap();
            let sundays = days - working;
            // Every 28-31 day month has four or five Sundays.
            prop_assert!((4..=5).contains(&sundays));
            prop_assert!(working > 0);
        }

        #[test]
        fn prop_previous_month_is_one_month_back(days in 0i64..60_000) {
            let today = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Duration::days(days);
            let (month, year) = previous_month(today);
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
            prop_assert!(first < this_month);
            prop_assert_eq!(first + chrono::Duration::days(days_in_month(month, year).unwrap() as i64), this_month);
        }
    }
}
