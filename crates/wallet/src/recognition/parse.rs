//! Regex extraction of voucher fields from free text.
//!
//! Used on OCR output and on model answers that are not valid JSON.

use std::sync::LazyLock;

use chrono::NaiveDate;
use gifticon_core::{ExtractedInfo, Won};
use regex::Regex;

/// Stores recognised by name in OCR text, checked in order.
pub const KNOWN_STORES: [&str; 7] = [
    "스타벅스",
    "맥도날드",
    "GS25",
    "CU",
    "세븐일레븐",
    "이디야",
    "투썸플레이스",
];

// Either properly grouped thousands or a plain digit run, followed by 원.
// An ungrouped run such as `4500원` is read whole, not as its last three digits.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)\s*원").expect("Invalid regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").expect("Invalid regex"));

/// First positive amount followed by `원`. Zero amounts are skipped.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Won> {
    AMOUNT_RE
        .captures_iter(text)
        .find_map(|captures| captures.get(1)?.as_str().parse().ok())
}

/// First `YYYY-MM-DD` style date (separators `-`, `.` or `/`).
///
/// Dates that don't exist on the calendar are dropped.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let captures = DATE_RE.captures(text)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let month = captures.get(2)?.as_str().parse().ok()?;
    let day = captures.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First entry of [`KNOWN_STORES`] mentioned in the text.
#[must_use]
pub fn parse_store(text: &str) -> Option<String> {
    KNOWN_STORES
        .iter()
        .find(|store| text.contains(*store))
        .map(|store| (*store).to_string())
}

/// Amount and expiry date from a model's free-text answer.
#[must_use]
pub fn parse_text_response(text: &str) -> ExtractedInfo {
    ExtractedInfo {
        amount: parse_amount(text),
        expiry_date: parse_date(text),
        ..ExtractedInfo::default()
    }
}

/// Amount, expiry date and store from raw OCR text.
#[must_use]
pub fn parse_extracted_text(text: &str) -> ExtractedInfo {
    ExtractedInfo {
        store: parse_store(text),
        ..parse_text_response(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn test_amount_with_and_without_separators() {
        assert_eq!(parse_amount("금액: 4,500원").map(|w| w.get()), Some(4500));
        assert_eq!(parse_amount("15000원 상품권").map(|w| w.get()), Some(15000));
        assert_eq!(parse_amount("1,234,567 원").map(|w| w.get()), Some(1_234_567));
        assert_eq!(parse_amount("교환권 500원").map(|w| w.get()), Some(500));
    }

    #[test]
    fn test_amount_requires_won_suffix_and_positive_value() {
        assert!(parse_amount("4500").is_none());
        assert!(parse_amount("0원").is_none());
        assert!(parse_amount("").is_none());
    }

    #[test]
    fn test_amount_skips_zero_and_takes_next() {
        assert_eq!(
            parse_amount("배송비 0원 / 상품권 5,000원").map(|w| w.get()),
            Some(5000)
        );
        assert_eq!(parse_amount("4500원").map(|w| w.get()), Some(4500));
    }

    #[test]
    fn test_date_separators_are_normalised() {
        assert_eq!(parse_date("유효기간 2025.07.05"), Some(date(2025, 7, 5)));
        assert_eq!(parse_date("2025/7/5 까지"), Some(date(2025, 7, 5)));
        assert_eq!(parse_date("2025-12-31"), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_impossible_date_is_dropped() {
        assert!(parse_date("2025.02.30").is_none());
        assert!(parse_date("2025.13.01").is_none());
    }

    #[test]
    fn test_store_match_uses_list_order() {
        assert_eq!(parse_store("GS25 편의점 모바일 상품권").as_deref(), Some("GS25"));
        assert_eq!(parse_store("스타벅스 e-Gift CU").as_deref(), Some("스타벅스"));
        assert!(parse_store("동네 빵집").is_none());
    }

    #[test]
    fn test_text_response_ignores_store() {
        let info = parse_text_response("스타벅스 아메리카노 4,500원 2025.07.05");
        assert!(info.store.is_none());
        assert_eq!(info.amount.map(|w| w.get()), Some(4500));
        assert_eq!(info.expiry_date, Some(date(2025, 7, 5)));
    }

    #[test]
    fn test_extracted_text_picks_up_all_fields() {
        let text = "이디야커피\n카페라떼 Tall\n5,000원\n유효기간: 2025.08.15";
        let info = parse_extracted_text(text);
        assert_eq!(info.store.as_deref(), Some("이디야"));
        assert_eq!(info.amount.map(|w| w.get()), Some(5000));
        assert_eq!(info.expiry_date, Some(date(2025, 8, 15)));
        assert!(info.name.is_none());
    }
}
