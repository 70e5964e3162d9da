//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as currency-prefixed display strings (`"₹1499"`)
//! and are parsed into a [`Price`] so the cart can snapshot the numeric
//! amount. Rendering goes back through [`format_amount`], which applies the
//! Indian digit grouping shoppers expect (`₹1,00,000`).

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum fraction digits shown when formatting an amount.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    /// The input string is empty or only a currency symbol.
    #[error("price cannot be empty")]
    Empty,
    /// The amount is not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store currency.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.currency_code, self.amount))
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let currency_code = CurrencyCode::INR;
        let unprefixed = trimmed
            .strip_prefix(currency_code.symbol())
            .unwrap_or(trimmed);

        let digits: String = unprefixed
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if digits.is_empty() {
            return Err(PriceParseError::Empty);
        }

        let amount = Decimal::from_str(&digits)
            .map_err(|_| PriceParseError::InvalidAmount(trimmed.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceParseError::Negative);
        }

        Ok(Self::new(amount, currency_code))
    }
}

impl TryFrom<String> for Price {
    type Error = PriceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// ISO 4217 currency codes.
///
/// The storefront sells in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
}

impl CurrencyCode {
    /// Display symbol prefixed to amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
        }
    }
}

/// Format an amount with its currency symbol and Indian digit grouping.
///
/// ```
/// use attar_core::{CurrencyCode, format_amount};
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(CurrencyCode::INR, Decimal::new(1499, 0)), "₹1,499");
/// assert_eq!(format_amount(CurrencyCode::INR, Decimal::new(100_000, 0)), "₹1,00,000");
/// assert_eq!(format_amount(CurrencyCode::INR, Decimal::new(99_950, 2)), "₹999.5");
/// ```
#[must_use]
pub fn format_amount(currency_code: CurrencyCode, amount: Decimal) -> String {
    let rendered = amount.round_dp(MAX_FRACTION_DIGITS).normalize().to_string();
    let (sign, unsigned) = rendered
        .strip_prefix('-')
        .map_or(("", rendered.as_str()), |rest| ("-", rest));
    let (integer, fraction) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut out = format!("{sign}{}{}", currency_code.symbol(), group_indian(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Group integer digits as lakh/crore: the last three, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_prefixed() {
        let price: Price = "₹1499".parse().unwrap();
        assert_eq!(price.amount, Decimal::new(1499, 0));
        assert_eq!(price.currency_code, CurrencyCode::INR);
    }

    #[test]
    fn test_parse_grouped_and_bare() {
        let grouped: Price = "₹1,00,000".parse().unwrap();
        assert_eq!(grouped.amount, Decimal::new(100_000, 0));

        let bare: Price = "999.50".parse().unwrap();
        assert_eq!(bare.amount, Decimal::new(99_950, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("₹".parse::<Price>(), Err(PriceParseError::Empty));
        assert_eq!("".parse::<Price>(), Err(PriceParseError::Empty));
        assert!(matches!(
            "₹abc".parse::<Price>(),
            Err(PriceParseError::InvalidAmount(_))
        ));
        assert_eq!("-5".parse::<Price>(), Err(PriceParseError::Negative));
    }

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian("0"), "0");
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1499"), "1,499");
        assert_eq!(group_indian("100000"), "1,00,000");
        assert_eq!(group_indian("12345678"), "1,23,45,678");
    }

    #[test]
    fn test_display_round_trips_through_string() {
        let price: Price = "₹2499".parse().unwrap();
        assert_eq!(price.to_string(), "₹2,499");

        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"₹2,499\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_amount(CurrencyCode::INR, Decimal::ZERO), "₹0");
    }
}
