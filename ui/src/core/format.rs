//! Presentation formatting helpers.

use time::macros::format_description;

use crate::core::model::{parse_wire_date, parse_wire_time};

/// Response time as shown on cards and tables, e.g. `1.84s`.
pub fn format_seconds(value: f64) -> String {
    format!("{value:.2}s")
}

/// Millisecond-precision variant used on the detail page.
pub fn format_seconds_precise(value: f64) -> String {
    format!("{value:.3}s")
}

/// Mean analyses per day, one decimal place.
pub fn format_per_day(value: f64) -> String {
    format!("{value:.1}")
}

/// Renders a wire date as `DD/MM/YYYY`, leaving the raw text alone when it
/// does not parse.
pub fn format_wire_date(raw: &str) -> String {
    match parse_wire_date(raw) {
        Some(date) => {
            let format = format_description!("[day]/[month]/[year]");
            date.format(&format)
                .unwrap_or_else(|_| raw.trim().to_string())
        }
        None => raw.trim().to_string(),
    }
}

/// Renders a wire time as `HH:MM:SS`, leaving the raw text alone when it
/// does not parse.
pub fn format_wire_time(raw: &str) -> String {
    match parse_wire_time(raw) {
        Some(clock) => {
            let format = format_description!("[hour]:[minute]:[second]");
            clock
                .format(&format)
                .unwrap_or_else(|_| raw.trim().to_string())
        }
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_format_with_two_decimals() {
        assert_eq!(format_seconds(1.846), "1.85s");
        assert_eq!(format_seconds(0.0), "0.00s");
    }

    #[test]
    fn precise_seconds_keep_three_decimals() {
        assert_eq!(format_seconds_precise(1.8462), "1.846s");
    }

    #[test]
    fn per_day_keeps_one_decimal() {
        assert_eq!(format_per_day(2.25), "2.2");
        assert_eq!(format_per_day(0.0), "0.0");
    }

    #[test]
    fn wire_dates_render_day_first() {
        assert_eq!(format_wire_date("2024-05-01"), "01/05/2024");
        assert_eq!(format_wire_date("2024-05-01T09:15:00Z"), "01/05/2024");
    }

    #[test]
    fn unparseable_dates_pass_through_trimmed() {
        assert_eq!(format_wire_date(" pending "), "pending");
        assert_eq!(format_wire_date(""), "");
    }

    #[test]
    fn wire_times_render_padded() {
        assert_eq!(format_wire_time("09:15:00.123Z"), "09:15:00");
        assert_eq!(format_wire_time("whenever"), "whenever");
    }
}
