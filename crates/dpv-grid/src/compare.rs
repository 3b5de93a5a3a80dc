//! Cell comparators for sorting typed columns.
//!
//! Cells reach the comparators as raw strings, or `None` when the column is
//! absent from the row. Every comparator is deterministic and side-effect
//! free, and orders missing/unparseable values by the same asymmetric rule:
//! both missing compare equal; an unparseable left operand sorts before
//! everything, an unparseable right operand sorts after everything, so
//! invalid values always lose to valid ones regardless of side. The
//! unparseable branches are checked before the missing branches.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Lexical byte ordering; used when a column is not number or date typed.
pub fn compare_strings(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Extracts the f64 a number-typed cell sorts by.
pub fn number_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Numeric ordering with the asymmetric invalid-extreme rule.
pub fn compare_numbers(a: Option<&str>, b: Option<&str>) -> Ordering {
    if a.is_none() && b.is_none() {
        return Ordering::Equal;
    }
    if let Some(a) = a
        && number_value(a).is_none()
    {
        return Ordering::Less;
    }
    if let Some(b) = b
        && number_value(b).is_none()
    {
        return Ordering::Greater;
    }
    let (Some(a), Some(b)) = (a, b) else {
        // One side missing, the other valid.
        return if a.is_none() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    };
    let (a, b) = (number_value(a), number_value(b));
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Coarse chronological sort key: year first, then a month/day composite.
///
/// The composite weights the month by a fixed multiplier instead of real
/// days-in-month arithmetic. This matches the grid's historical ordering
/// and stays; do not replace it with calendar math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    fn month_day_composite(self) -> u32 {
        self.month * 32 + self.day
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month_day_composite().cmp(&other.month_day_composite()))
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Extracts the sort key a date-typed cell orders by.
///
/// With a declared format the cell is parsed against it, trying the full
/// zoned form first, then naive datetime, then bare date, so date-only and
/// datetime formats both resolve. Without a format a few ISO shapes are
/// tried instead.
pub fn date_value(raw: &str, format: Option<&str>) -> Option<DateKey> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match format {
        Some(format) => parse_with_format(trimmed, format),
        None => ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M", "%Y-%m-%d"]
            .iter()
            .find_map(|fallback| parse_with_format(trimmed, fallback)),
    }
}

fn parse_with_format(value: &str, format: &str) -> Option<DateKey> {
    if let Ok(zoned) = DateTime::parse_from_str(value, format) {
        return Some(key_from(zoned.date_naive()));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
        return Some(key_from(naive.date()));
    }
    NaiveDate::parse_from_str(value, format).ok().map(key_from)
}

fn key_from(date: NaiveDate) -> DateKey {
    DateKey {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    }
}

/// Chronological ordering with the asymmetric invalid-extreme rule.
pub fn compare_dates(a: Option<&str>, b: Option<&str>, format: Option<&str>) -> Ordering {
    if a.is_none() && b.is_none() {
        return Ordering::Equal;
    }
    if let Some(a) = a
        && date_value(a, format).is_none()
    {
        return Ordering::Less;
    }
    if let Some(b) = b
        && date_value(b, format).is_none()
    {
        return Ordering::Greater;
    }
    let (Some(a), Some(b)) = (a, b) else {
        return if a.is_none() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    };
    match (date_value(a, format), date_value(b, format)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}
