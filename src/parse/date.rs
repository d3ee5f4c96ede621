//! Expiry date reformatting for the renewal sentence
//!
//! The renewal message embeds the output of `date`, e.g.
//! `Mon Dec  1 11:38:34 AM WIB 2025`. Its shape depends on the host locale,
//! so a few known layouts are tried in order and the first match is rendered
//! as `DD-MM-YYYY HH:MM`, the same form the account summary uses.

use chrono::NaiveDateTime;

/// Layouts tried in order, after whitespace collapsing and zone removal
const LAYOUTS: &[&str] = &[
    // Mon Dec 1 11:38:34 AM 2025
    "%a %b %d %I:%M:%S %p %Y",
    // Mon Dec 1 23:38:34 2025
    "%a %b %d %H:%M:%S %Y",
    // Mon 01 Dec 2025 11:38:34 AM
    "%a %d %b %Y %I:%M:%S %p",
    // Mon 01 Dec 2025 23:38:34
    "%a %d %b %Y %H:%M:%S",
];

const OUTPUT_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Reformat a `date`-style timestamp to `DD-MM-YYYY HH:MM` (24-hour)
///
/// Returns `None` when no known layout matches; callers keep the raw text.
pub fn reformat_expiry(raw: &str) -> Option<String> {
    // Collapsing whitespace also covers `date` padding single-digit days
    // with a second space.
    let cleaned = raw
        .split_whitespace()
        .filter(|token| !is_zone_token(token))
        .collect::<Vec<_>>()
        .join(" ");

    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(&cleaned, layout).ok())
        .map(|dt| dt.format(OUTPUT_FORMAT).to_string())
}

/// Zone tokens chrono cannot parse here: abbreviations like `WIB` or `CEST`,
/// and the numeric `+07` / `-0330` that `date` prints when tzdata has no name
fn is_zone_token(token: &str) -> bool {
    is_zone_abbreviation(token) || is_zone_offset(token)
}

fn is_zone_abbreviation(token: &str) -> bool {
    (2..=5).contains(&token.len())
        && token.bytes().all(|b| b.is_ascii_uppercase())
        && token != "AM"
        && token != "PM"
}

fn is_zone_offset(token: &str) -> bool {
    match token.strip_prefix(['+', '-']) {
        Some(digits) => {
            (2..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_hour_with_padded_day() {
        assert_eq!(
            reformat_expiry("Mon Dec  1 11:38:34 AM WIB 2025"),
            Some("01-12-2025 11:38".to_string())
        );
    }

    #[test]
    fn test_twelve_hour_pm() {
        assert_eq!(
            reformat_expiry("Mon Dec 1 02:05:00 PM WIB 2025"),
            Some("01-12-2025 14:05".to_string())
        );
    }

    #[test]
    fn test_twenty_four_hour() {
        assert_eq!(
            reformat_expiry("Tue Dec 30 21:05:59 UTC 2025"),
            Some("30-12-2025 21:05".to_string())
        );
    }

    #[test]
    fn test_day_first_layout() {
        assert_eq!(
            reformat_expiry("Mon 01 Dec 2025 11:38:34 AM WIB"),
            Some("01-12-2025 11:38".to_string())
        );
    }

    #[test]
    fn test_numeric_zone_offset() {
        assert_eq!(
            reformat_expiry("Mon Dec  1 11:38:34 AM +07 2025"),
            Some("01-12-2025 11:38".to_string())
        );
        assert_eq!(
            reformat_expiry("Tue Dec 30 21:05:59 -0330 2025"),
            Some("30-12-2025 21:05".to_string())
        );
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(reformat_expiry("sometime next week"), None);
        assert_eq!(reformat_expiry(""), None);
        assert_eq!(reformat_expiry("2025-12-01"), None);
    }

    #[test]
    fn test_zone_abbreviation() {
        assert!(is_zone_abbreviation("WIB"));
        assert!(is_zone_abbreviation("CEST"));
        assert!(!is_zone_abbreviation("AM"));
        assert!(!is_zone_abbreviation("Dec"));
        assert!(!is_zone_abbreviation("2025"));
    }

    #[test]
    fn test_zone_offset() {
        assert!(is_zone_offset("+07"));
        assert!(is_zone_offset("-0330"));
        assert!(!is_zone_offset("2025"));
        assert!(!is_zone_offset("+7"));
        assert!(!is_zone_offset("+07:00"));
        assert!(!is_zone_token("11:38:34"));
    }
}
