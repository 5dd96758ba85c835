//! Display helpers shared by the aggregator and the trip summary.

use chrono::DateTime;

const SCALES: [(f64, &str); 7] = [
    (1.0, ""),
    (1e3, " thousand"),
    (1e6, " million"),
    (1e9, " billion"),
    (1e12, " trillion"),
    (1e15, " quadrillion"),
    (1e18, " quintillion"),
];

/// Format a Unix timestamp as a 24-hour `HH:MM` wall-clock time.
///
/// No timezone is applied: the weather provider already reports sunrise
/// and sunset in the destination's local time. Out-of-range timestamps
/// format as an empty string.
pub fn unix_timestamp_to_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Round to `digits` decimals, halves away from zero (2.5 -> 3).
fn round_to(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    format!("{:.*}", digits, (value * scale).round() / scale)
}

/// Convert metres per second to km/h, rounded to `digits` decimals.
pub fn mps_to_kmph(mps: f64, digits: usize) -> String {
    round_to(mps * 3.6, digits)
}

/// Abbreviate a large number with a word suffix, e.g. 2500 -> "2.5 thousand".
///
/// Trailing zero decimals are dropped. Numbers below 1 format as "0".
pub fn number_formatter(num: f64, digits: usize) -> String {
    match SCALES.iter().rev().find(|(value, _)| num >= *value) {
        Some((value, suffix)) => {
            let scaled = round_to(num / value, digits);
            format!("{}{}", trim_zero_fraction(&scaled), suffix)
        }
        None => "0".to_string(),
    }
}

fn trim_zero_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_zero_pads_hours_and_minutes() {
        // 1970-01-02 05:03:00
        assert_eq!(unix_timestamp_to_time(86_400 + 5 * 3600 + 3 * 60), "05:03");
        assert_eq!(unix_timestamp_to_time(23 * 3600), "23:00");
        assert_eq!(unix_timestamp_to_time(0), "00:00");
    }

    #[test]
    fn test_time_ignores_seconds() {
        assert_eq!(unix_timestamp_to_time(1_710_054_359), "07:05");
    }

    #[test]
    fn test_mps_to_kmph() {
        assert_eq!(mps_to_kmph(10.0, 0), "36");
        assert_eq!(mps_to_kmph(1.0, 1), "3.6");
        assert_eq!(mps_to_kmph(0.0, 0), "0");
        assert_eq!(mps_to_kmph(4.2, 2), "15.12");
    }

    #[test]
    fn test_exact_halves_round_up() {
        // 1.25 m/s is exactly 4.5 km/h
        assert_eq!(mps_to_kmph(1.25, 0), "5");
        assert_eq!(number_formatter(2500.0, 0), "3 thousand");
        assert_eq!(number_formatter(1250.0, 1), "1.3 thousand");
    }

    #[test]
    fn test_number_formatter() {
        assert_eq!(number_formatter(2500.0, 1), "2.5 thousand");
        assert_eq!(number_formatter(900.0, 0), "900");
        assert_eq!(number_formatter(2_000_000.0, 1), "2 million");
        assert_eq!(number_formatter(2_138_551.0, 0), "2 million");
        assert_eq!(number_formatter(1_500_000_000.0, 2), "1.5 billion");
        assert_eq!(number_formatter(3e18, 0), "3 quintillion");
    }

    #[test]
    fn test_time_before_epoch() {
        assert_eq!(unix_timestamp_to_time(-60), "23:59");
    }

    #[test]
    fn test_number_formatter_below_one() {
        assert_eq!(number_formatter(0.0, 0), "0");
        assert_eq!(number_formatter(0.4, 2), "0");
    }
}
