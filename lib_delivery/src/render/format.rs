//! # Display Formatting
//!
//! Rules applied to every rendered item, whatever provider it came from:
//!
//! - **Prices**: thousands separators are stripped, the number is re-grouped
//!   (en-US style, at most three fraction digits) and the currency suffix is
//!   appended only when the source did not already embed a currency token.
//! - **Statuses**: machine values go through a fixed table; anything unknown is
//!   upper-cased rather than dropped.
//! - **Long text**: cut to a character budget with an ellipsis, counting
//!   Unicode scalar values so a multibyte sequence is never split.

use std::sync::OnceLock;

use regex::Regex;

/// Currency tokens recognised inside a source price (case-insensitive).
pub const CURRENCY_TOKENS: &[&str] = &["AED", "USD", "EUR", "GBP", "$", "€", "£"];

/// Text used when a source has no price at all.
pub const PRICE_ON_REQUEST: &str = "Price on Request";

/// Status shown when a source has no status at all.
pub const DEFAULT_STATUS: &str = "FOR SALE";

const STATUS_LABELS: &[(&str, &str)] = &[
    ("for-sale", "FOR SALE"),
    ("for sale", "FOR SALE"),
    ("sold", "SOLD"),
    ("under-offer", "UNDER OFFER"),
    ("under offer", "UNDER OFFER"),
    ("coming-soon", "COMING SOON"),
    ("coming soon", "COMING SOON"),
];

fn currency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternatives: Vec<String> = CURRENCY_TOKENS.iter().map(|t| regex::escape(t)).collect();
        Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).expect("currency token pattern is valid")
    })
}

/// True when `price` already names a currency.
pub fn has_currency_token(price: &str) -> bool {
    currency_pattern().is_match(price)
}

/// Formats a raw source price for display.
///
/// ```
/// use lib_delivery::render::format_price;
///
/// assert_eq!(format_price(Some("150,000,000"), "AED"), "150,000,000 AED");
/// assert_eq!(format_price(Some("AED 85M"), "AED"), "AED 85M");
/// assert_eq!(format_price(Some("2500000.5"), "AED"), "2,500,000.5 AED");
/// ```
pub fn format_price(raw: Option<&str>, currency: &str) -> String {
    let price = raw.map(str::trim).unwrap_or_default();

    if price.is_empty() {
        return format!("{} {}", PRICE_ON_REQUEST, currency);
    }
    if has_currency_token(price) {
        return price.to_string();
    }

    let plain = price.replace(',', "");
    let plain = plain.trim();
    if let Some(grouped) = group_integer(plain) {
        return format!("{} {}", grouped, currency);
    }

    match plain.parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{} {}", group_thousands(value), currency),
        _ => format!("{} {}", price, currency),
    }
}

/// Groups a whole number straight from its digits, so values past `f64`
/// precision keep every digit. `None` for anything that is not `-?[0-9]+`.
fn group_integer(plain: &str) -> Option<String> {
    let (negative, digits) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = digits.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut grouped = group_digits(digits);
    if negative && digits != "0" {
        grouped.insert(0, '-');
    }
    Some(grouped)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Groups the integer part in threes and keeps up to three fraction digits.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = group_digits(int_part);
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    if value.is_sign_negative() && grouped.chars().any(|c| c != '0' && c != ',' && c != '.') {
        grouped.insert(0, '-');
    }
    grouped
}

/// Maps a machine status to its display label.
pub fn format_status(raw: Option<&str>) -> String {
    let status = raw.map(str::trim).unwrap_or_default();
    if status.is_empty() {
        return DEFAULT_STATUS.to_string();
    }

    let normalized = status.to_lowercase();
    STATUS_LABELS
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| status.to_uppercase())
}

/// Cuts `text` to `budget` characters, the last one being `…`.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(budget - 1).collect();
    cut.push('…');
    cut
}
