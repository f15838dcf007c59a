//! Month and timestamp parsing.
//!
//! Month labels arrive as "Jan 2024", "January 2024", "2024-01", full ISO
//! dates or database timestamps; only the year and month are kept. Sorting
//! always happens on [`MonthKey`] values, never on the label text.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use nkpi_model::{DropReason, MonthKey, RawValue};

use super::numeric::coerce_numeric;

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%#z"];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y"];

const LABEL_FORMATS: [&str; 2] = ["%d %b %Y", "%d %B %Y"];

/// chrono's `%Y` takes any digit count, so `Jan-24` would land in year 24.
const MIN_YEAR: i32 = 1000;

/// Parse a timestamp or date; dates map to midnight.
///
/// Offsets are dropped and the local wall-clock time is kept, so the month
/// matches what the source displays.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    any_timestamp(trimmed).filter(|ts| ts.year() >= MIN_YEAR)
}

fn any_timestamp(trimmed: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Some(dt.naive_local());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parse a month label into a [`MonthKey`].
///
/// Years must be written out in full; `Jan-24` is rejected.
///
/// ```
/// use nkpi_model::MonthKey;
/// use nkpi_transform::normalization::parse_month_key;
///
/// let jan = MonthKey::new(2024, 1).unwrap();
/// assert_eq!(parse_month_key("Jan 2024"), Some(jan));
/// assert_eq!(parse_month_key("2024-01-15"), Some(jan));
/// assert_eq!(parse_month_key("not a month"), None);
/// ```
pub fn parse_month_key(value: &str) -> Option<MonthKey> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    // "Jan 2024", "January 2024", "Jan-2024"
    let with_day = format!("1 {}", trimmed.replace('-', " "));
    let labelled = LABEL_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&with_day, format).ok());
    // "2024-01", "2024/01"
    let first_of_month = format!("{}-01", trimmed.replace('/', "-"));
    labelled
        .or_else(|| NaiveDate::parse_from_str(&first_of_month, "%Y-%m-%d").ok())
        .map(MonthKey::from_date)
        .or_else(|| any_timestamp(trimmed).map(MonthKey::from_datetime))
        .filter(|key| key.year() >= MIN_YEAR)
}

/// Month for a label cell.
pub fn month_key_for_value(value: &RawValue) -> Result<MonthKey, DropReason> {
    match value {
        RawValue::Null => Err(DropReason::MissingValue),
        RawValue::Text(s) => parse_month_key(s).ok_or(DropReason::UnparsableDate),
        RawValue::Number(_) => Err(DropReason::UnparsableDate),
    }
}

/// Timestamp for an event or creation-time cell.
pub fn timestamp_for_value(value: &RawValue) -> Result<NaiveDateTime, DropReason> {
    match value {
        RawValue::Null => Err(DropReason::MissingValue),
        RawValue::Text(s) => parse_timestamp(s).ok_or(DropReason::UnparsableTimestamp),
        RawValue::Number(_) => Err(DropReason::UnparsableTimestamp),
    }
}

/// Compose a month from separate year and month cells (`year-month-01`).
pub fn compose_month_key(year: &RawValue, month: &RawValue) -> Result<MonthKey, DropReason> {
    let year = whole_number(year)?;
    let month = whole_number(month)?;
    if !(1.0..=12.0).contains(&month) || year.abs() > f64::from(i32::MAX) {
        return Err(DropReason::UnparsableDate);
    }
    MonthKey::new(year as i32, month as u32).map_err(|_| DropReason::UnparsableDate)
}

fn whole_number(value: &RawValue) -> Result<f64, DropReason> {
    let number = match value {
        RawValue::Null => return Err(DropReason::MissingValue),
        RawValue::Number(n) => *n,
        RawValue::Text(s) => coerce_numeric(s).ok_or(DropReason::UnparsableDate)?,
    };
    if number.is_finite() && number.fract() == 0.0 {
        Ok(number)
    } else {
        Err(DropReason::UnparsableDate)
    }
}
