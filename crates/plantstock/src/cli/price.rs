//! Price input parsing.
//!
//! Accepts digits with `.` or `,` as the decimal separator. The store only
//! ever sees the parsed number.

use regex::Regex;
use std::sync::OnceLock;

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9.,]+$").expect("valid price regex"))
}

/// Parse a user-entered price such as `4.50` or `4,50`.
pub fn parse_price(input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("price is empty".to_string());
    }
    if !price_pattern().is_match(trimmed) {
        return Err(format!(
            "invalid price '{}': use digits with '.' or ',' as decimal separator",
            trimmed
        ));
    }
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Err(format!("invalid price '{}': no digits", trimmed));
    }

    let normalized = trimmed.replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| format!("invalid price '{}': more than one decimal separator", trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_both_separators() {
        assert_eq!(parse_price("4.50"), Ok(4.5));
        assert_eq!(parse_price("4,50"), Ok(4.5));
        assert_eq!(parse_price(" 12 "), Ok(12.0));
        assert_eq!(parse_price("0"), Ok(0.0));
    }

    #[test]
    fn test_parse_price_rejects_other_characters() {
        assert!(parse_price("-1").is_err());
        assert!(parse_price("$4").is_err());
        assert!(parse_price("1e3").is_err());
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("").is_err());
    }

    #[test]
    fn test_parse_price_rejects_two_separators() {
        let err = parse_price("1.234,56").unwrap_err();
        assert!(err.contains("more than one decimal separator"));
    }

    #[test]
    fn test_parse_price_rejects_bare_separator() {
        for input in [".", ",", ".,"] {
            let err = parse_price(input).unwrap_err();
            assert!(err.contains("no digits"), "{input}: {err}");
        }
    }
}
