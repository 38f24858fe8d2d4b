use crate::error::{AnalyticsError, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year.checked_add(1)? } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}

/// Number of calendar days in `(year, month)`, leap years included.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        return Err(AnalyticsError::InvalidMonth(month.to_string()));
    }

    last_day_of_month(year, month)
        .map(|date| date.day())
        .ok_or(AnalyticsError::InvalidYear(year))
}

pub fn month_label(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

pub fn day_label(month: &str, day: u32) -> String {
    format!("{}-{:02}", month, day)
}

/// Parses an `Order Date` cell against each format in turn. Formats with a
/// time component are parsed as datetimes and truncated to the date.
pub fn parse_order_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format).ok().or_else(|| {
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .map(|dt| dt.date())
        })
    })
}

/// Parses a numeric cell. Empty, `NaN` and infinite cells are missing values.
pub fn parse_number(value: &str, column: &str, line: usize) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(number) if !number.is_finite() => Ok(None),
        Ok(number) => Ok(Some(number)),
        Err(_) => Err(AnalyticsError::InvalidValue {
            column: column.to_string(),
            line,
            value: value.to_string(),
        }),
    }
}
