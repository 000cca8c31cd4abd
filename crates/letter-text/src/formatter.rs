//! Long-form English date formatting

use crate::{LetterTextError, Result};
use chrono::{Datelike, NaiveDate};

/// Format used by HTML date pickers
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// English month names (long)
const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Ordinal suffix for a day of month
///
/// Days 4 through 20 always take "th" (this covers 11, 12 and 13).
/// Every other day is suffixed by its last digit.
///
/// # Examples
/// ```
/// use letter_text::ordinal_suffix;
/// assert_eq!(ordinal_suffix(1), "st");
/// assert_eq!(ordinal_suffix(12), "th");
/// assert_eq!(ordinal_suffix(23), "rd");
/// ```
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Full English month name
///
/// # Arguments
/// * `month` - Month (1-12)
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTHS_LONG.get(idx as usize))
        .copied()
        .unwrap_or("")
}

/// Format a date as `<day><suffix> <Month> <year>` (e.g., "31st August 2025")
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{}{} {} {}",
        day,
        ordinal_suffix(day),
        month_name(date.month()),
        date.year()
    )
}

/// Parse a `YYYY-MM-DD` date-picker value
pub fn parse_date_input(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT)
        .map_err(|e| LetterTextError::InvalidDate(format!("'{input}': {e}")))
}

/// Render a date the way a date picker holds it (`YYYY-MM-DD`)
pub fn to_date_input(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

/// Format a raw date-picker value as a long-form date
///
/// An empty value formats to an empty string.
pub fn format_date_input(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    parse_date_input(input).map(format_long_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_ordinal_suffix_first_digits() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
    }

    #[test]
    fn test_ordinal_suffix_teens() {
        for day in 11..=13 {
            assert_eq!(ordinal_suffix(day), "th", "day {day}");
        }
        assert_eq!(ordinal_suffix(20), "th");
    }

    #[test]
    fn test_ordinal_suffix_twenties_and_thirties() {
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(24), "th");
        assert_eq!(ordinal_suffix(30), "th");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(8), "August");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date(date(2025, 8, 31)), "31st August 2025");
        assert_eq!(format_long_date(date(2025, 1, 1)), "1st January 2025");
        assert_eq!(format_long_date(date(2025, 1, 11)), "11th January 2025");
        assert_eq!(format_long_date(date(2025, 1, 22)), "22nd January 2025");
        assert_eq!(format_long_date(date(2025, 4, 23)), "23rd April 2025");
        assert_eq!(format_long_date(date(2024, 2, 29)), "29th February 2024");
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("2025-08-03").unwrap(), date(2025, 8, 3));
        assert_eq!(parse_date_input(" 2025-08-03 ").unwrap(), date(2025, 8, 3));
    }

    #[test]
    fn test_parse_date_input_invalid() {
        assert!(parse_date_input("31/08/2025").is_err());
        assert!(parse_date_input("2025-02-30").is_err());
        assert!(parse_date_input("not a date").is_err());
    }

    #[test]
    fn test_to_date_input() {
        assert_eq!(to_date_input(date(2025, 4, 3)), "2025-04-03");
    }

    #[test]
    fn test_format_date_input() {
        assert_eq!(format_date_input("2025-04-23").unwrap(), "23rd April 2025");
        assert_eq!(format_date_input("   ").unwrap(), "");
        assert!(format_date_input("2025-13-01").is_err());
    }
}
