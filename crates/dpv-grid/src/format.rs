//! Translation of data-package date formats to chrono specifiers.
//!
//! Data-package documents declare date formats in Python's strftime
//! vocabulary. chrono shares most of that vocabulary, so the bulk of the
//! table below pins tokens to themselves; the entries that differ (notably
//! `%f`, microseconds in strftime but nanoseconds in chrono) are rewritten.
//!
//! Translation is plain left-to-right string replacement applied one table
//! entry at a time, in table order. It is not re-scan protected: a
//! replacement's output can be matched by a later entry, so the order of
//! the table is part of the contract and must not be shuffled.

/// Ordered (strftime token, chrono specifier) substitution table.
static TOKEN_TABLE: &[(&str, &str)] = &[
    ("%A", "%A"), // full weekday name
    ("%a", "%a"), // abbreviated weekday name
    ("%B", "%B"), // full month name
    ("%b", "%b"), // abbreviated month name
    ("%Y", "%Y"), // 4-digit year
    ("%y", "%y"), // 2-digit year
    ("%m", "%m"), // zero-padded month
    ("%d", "%d"), // zero-padded day
    ("%e", "%e"), // space-padded day
    ("%j", "%j"), // day of year
    ("%H", "%H"), // zero-padded 24-hour
    ("%I", "%I"), // zero-padded 12-hour
    ("%M", "%M"), // zero-padded minute
    ("%S", "%S"), // zero-padded second
    ("%f", "%6f"), // microseconds; chrono's bare %f is nanoseconds
    ("%p", "%p"), // AM/PM
    ("%z", "%z"), // UTC offset
    ("%Z", "%Z"), // time-zone name
    ("%U", "%U"), // week of year, Sunday-first
    ("%W", "%W"), // week of year, Monday-first
    ("%%", "%%"), // literal percent
];

/// Translates a data-package strftime format into a chrono format string.
///
/// Unknown tokens and literal text pass through untouched. An empty input
/// yields an empty output.
pub fn translate_format(format: &str) -> String {
    let mut translated = format.to_string();
    for (token, replacement) in TOKEN_TABLE {
        translated = translated.replace(token, replacement);
    }
    translated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_keeps_token_order_and_separators() {
        assert_eq!(translate_format("%Y-%m-%d"), "%Y-%m-%d");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(translate_format(""), "");
    }

    #[test]
    fn microseconds_widen_to_six_digits() {
        assert_eq!(translate_format("%H:%M:%S.%f"), "%H:%M:%S.%6f");
    }

    #[test]
    fn literal_percent_survives() {
        assert_eq!(translate_format("%d%%"), "%d%%");
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(
            translate_format("%Y-%m-%dT%H:%MZ"),
            "%Y-%m-%dT%H:%MZ"
        );
    }
}
