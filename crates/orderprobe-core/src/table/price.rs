//! Price parsing for table cells.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    // Optional dollar sign, digits, a point and exactly two digits. A third
    // fractional digit disqualifies the match.
    pub static ref PRICE_PATTERN: Regex = Regex::new(
        r"\$?([0-9]+\.[0-9]{2})(?:[^0-9]|$)"
    ).unwrap();
}

/// Parse the first price in `text`, e.g. `"$1.23"` or `"Cost: 4.50 USD"`.
///
/// `"$1.2"` and `"$1.234"` do not parse.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let caps = PRICE_PATTERN.captures(text)?;
    let mut price = Decimal::from_str(&caps[1]).ok()?;
    price.rescale(2);
    Some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1.23"), Some(dec("1.23")));
        assert_eq!(parse_price("1.23"), Some(dec("1.23")));
        assert_eq!(parse_price("$1,000.50"), Some(dec("0.50")));
        assert_eq!(parse_price("Total: $12.00 (2 x $6.00)"), Some(dec("12.00")));
        assert_eq!(parse_price("$0.99each"), Some(dec("0.99")));
    }

    #[test]
    fn test_keeps_two_decimal_places() {
        let price = parse_price("$5.10").unwrap();
        assert_eq!(price.scale(), 2);
        assert_eq!(price.to_string(), "5.10");
    }

    #[test]
    fn test_requires_exactly_two_fractional_digits() {
        assert_eq!(parse_price("$1.2"), None);
        assert_eq!(parse_price("$1.234"), None);
        assert_eq!(parse_price("$12"), None);
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("Free"), None);
        assert_eq!(parse_price("$.50"), None);
    }
}
