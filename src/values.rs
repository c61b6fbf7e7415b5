// Value Parsers - dates and amounts as Rabobank writes them

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

// ============================================================================
// DATES
// ============================================================================

static COMPACT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").expect("valid regex"));
static HYPHENATED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));

/// Textual date layouts found in Rabobank exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `YYYYMMDD`, embedded in the export's file name.
    Compact,
    /// `YYYY-MM-DD`, used inside the rows.
    Hyphenated,
}

impl DateLayout {
    fn pattern(&self) -> &'static Regex {
        match self {
            DateLayout::Compact => &COMPACT_DATE,
            DateLayout::Hyphenated => &HYPHENATED_DATE,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DateLayout::Compact => "YYYYMMDD",
            DateLayout::Hyphenated => "YYYY-MM-DD",
        }
    }
}

/// Parse the first occurrence of `layout` in `text` into a calendar date.
///
/// Both layouts capture year, month and day groups, so they resolve to the
/// same calendar semantics. Impossible days (`2021-02-30`) are rejected.
pub fn parse_date(text: &str, layout: DateLayout) -> Result<NaiveDate> {
    let malformed = || ImportError::MalformedDate {
        text: text.to_string(),
        layout: layout.describe(),
    };

    let caps = layout.pattern().captures(text).ok_or_else(malformed)?;
    let year: i32 = caps[1].parse().map_err(|_| malformed())?;
    let month: u32 = caps[2].parse().map_err(|_| malformed())?;
    let day: u32 = caps[3].parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

// ============================================================================
// AMOUNTS
// ============================================================================

/// A signed decimal number in a fixed commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Amount {
            number,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

// "1.234,56" / "12,50": dots group thousands, comma is the decimal point.
static DECIMAL_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:\.\d{3})+|\d+),(\d+)$").expect("valid regex")
});
// "1234.56" / "12"
static DECIMAL_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("valid regex"));

/// Reduce an amount cell to an unsigned numeral with a decimal point.
fn normalize_numeral(text: &str) -> Option<String> {
    let unsigned = text.trim();
    let unsigned = unsigned
        .strip_prefix(['+', '-'])
        .unwrap_or(unsigned);

    if let Some(caps) = DECIMAL_COMMA.captures(unsigned) {
        return Some(format!("{}.{}", caps[1].replace('.', ""), &caps[2]));
    }

    DECIMAL_POINT
        .is_match(unsigned)
        .then(|| unsigned.to_string())
}

/// Parse an amount cell, negating it when `is_withdrawal` is set.
///
/// Any explicit leading sign in `text` is discarded; the sign comes only
/// from `is_withdrawal`.
pub fn parse_amount(text: &str, is_withdrawal: bool, currency: &str) -> Result<Amount> {
    let malformed = || ImportError::MalformedAmount {
        text: text.to_string(),
    };

    let numeral = normalize_numeral(text).ok_or_else(malformed)?;
    let magnitude = Decimal::from_str(&numeral).map_err(|_| malformed())?;
    let number = if is_withdrawal { -magnitude } else { magnitude };

    Ok(Amount::new(number, currency))
}

/// Parse a signed Rabobank amount: a leading `-` marks a withdrawal.
pub fn parse_signed_amount(text: &str, currency: &str) -> Result<Amount> {
    parse_amount(text, text.trim_start().starts_with('-'), currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_date_compact() {
        let date = parse_date("20200131", DateLayout::Compact).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_date_compact_inside_file_name() {
        let date = parse_date("CSV_A_20191105_123456.csv", DateLayout::Compact).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 11, 5).unwrap());
    }

    #[test]
    fn test_parse_date_layouts_agree() {
        let compact = parse_date("20240229", DateLayout::Compact).unwrap();
        let hyphenated = parse_date("2024-02-29", DateLayout::Hyphenated).unwrap();
        assert_eq!(compact, hyphenated);
    }

    #[test]
    fn test_parse_date_wrong_layout() {
        let err = parse_date("20200131", DateLayout::Hyphenated).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDate { layout: "YYYY-MM-DD", .. }));
    }

    #[test]
    fn test_parse_date_impossible_day() {
        assert!(parse_date("2021-02-30", DateLayout::Hyphenated).is_err());
    }

    #[test]
    fn test_parse_amount_decimal_comma() {
        let amount = parse_amount("+100,00", false, "EUR").unwrap();
        assert_eq!(amount, Amount::new(dec!(100.00), "EUR"));
    }

    #[test]
    fn test_parse_amount_withdrawal_negates() {
        let amount = parse_amount("25,50", true, "EUR").unwrap();
        assert_eq!(amount.number, dec!(-25.50));
    }

    #[test]
    fn test_parse_amount_localized_and_international_agree() {
        let localized = parse_amount("1.234,56", true, "EUR").unwrap();
        let international = parse_amount("1234.56", true, "EUR").unwrap();
        assert_eq!(localized, international);
        assert_eq!(localized.number, dec!(-1234.56));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for text in ["", "-", "abc", "1,2,3", "1.234.567", "12,", "1 000,00"] {
            let err = parse_amount(text, false, "EUR").unwrap_err();
            assert!(matches!(err, ImportError::MalformedAmount { .. }), "{text}");
        }
    }

    #[test]
    fn test_parse_signed_amount_sign_consistency() {
        let cases = [
            ("-25,50", dec!(-25.50)),
            ("+25,50", dec!(25.50)),
            ("25,50", dec!(25.50)),
            ("-0,01", dec!(-0.01)),
        ];
        for (text, expected) in cases {
            let amount = parse_signed_amount(text, "EUR").unwrap();
            assert_eq!(amount.number, expected, "{text}");
            assert_eq!(amount.number.is_sign_negative(), text.starts_with('-'));
        }
    }

    #[test]
    fn test_amount_keeps_configured_currency() {
        let amount = parse_signed_amount("-1,00", "USD").unwrap();
        assert_eq!(amount.currency, "USD");
        assert_eq!(amount.to_string(), "-1.00 USD");
    }
}
