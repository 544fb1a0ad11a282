use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Format a day count to one decimal place, dropping a trailing `.0`.
pub fn format_days(val: Decimal) -> String {
    val.round_dp(1).normalize().to_string()
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Parse a user-entered number. Currency symbols, thousands separators and
/// surrounding whitespace are ignored; anything unparseable becomes zero.
pub fn parse_number(raw: &str) -> Decimal {
    let cleaned = raw.replace(['$', ',', '%', '_'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// Parse a non-negative whole count. Fractions are truncated, negatives and
/// garbage become zero.
pub fn parse_count(raw: &str) -> u32 {
    let n = parse_number(raw).trunc();
    if n <= Decimal::ZERO {
        return 0;
    }
    n.to_u32().unwrap_or(u32::MAX)
}

/// Parse a signed whole number; garbage becomes zero.
pub fn parse_signed(raw: &str) -> i32 {
    let n = parse_number(raw).trunc();
    n.to_i32().unwrap_or(0)
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on" | "x"
    )
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod tests;
