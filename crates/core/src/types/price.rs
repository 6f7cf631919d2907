//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are Kenyan shillings in the currency's standard unit. The
//! storefront renders them the way shoppers read them on WhatsApp:
//! `KSH 1,500` or `KSH 2,499.5`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency label used in every rendered price.
pub const CURRENCY_LABEL: &str = "KSH";

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number (got {0:?})")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative price.
///
/// Equality is numeric, so `10` and `10.00` compare equal.
///
/// ## Examples
///
/// ```
/// use queens_beauty_core::Price;
///
/// let price = Price::parse("1500").unwrap();
/// assert_eq!(price.to_string(), "KSH 1,500");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price typed into a form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// Create a price from a whole number of shillings.
    #[must_use]
    pub fn from_shillings(shillings: u32) -> Self {
        Self(Decimal::from(shillings))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price multiplied by a quantity, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Plain numeric text without grouping or trailing zeros (`1500`, `19.5`).
    ///
    /// This is what the admin search matches against.
    #[must_use]
    pub fn as_plain_text(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Grouped amount without the currency label (`1,500`, `2,499.5`).
    #[must_use]
    pub fn grouped(&self) -> String {
        let text = self.0.round_dp(2).normalize().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let digits = whole.len();
        let mut out = String::with_capacity(digits + digits / 3 + 4);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_LABEL} {}", self.grouped())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Saturates at [`Decimal::MAX`].
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("10").unwrap(), Price::from_shillings(10));
        assert_eq!(Price::parse(" 19.99 ").unwrap().as_plain_text(), "19.99");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
        assert!(matches!(Price::parse("ten"), Err(PriceError::NotANumber(_))));
        assert_eq!(Price::parse("-5"), Err(PriceError::Negative));
    }

    #[test]
    fn test_numeric_equality_ignores_scale() {
        assert_eq!(Price::parse("10").unwrap(), Price::parse("10.00").unwrap());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_shillings(0).to_string(), "KSH 0");
        assert_eq!(Price::from_shillings(999).to_string(), "KSH 999");
        assert_eq!(Price::from_shillings(1500).to_string(), "KSH 1,500");
        assert_eq!(Price::from_shillings(1_234_567).to_string(), "KSH 1,234,567");
        assert_eq!(Price::parse("2499.50").unwrap().to_string(), "KSH 2,499.5");
    }

    #[test]
    fn test_plain_text_drops_trailing_zeros() {
        assert_eq!(Price::parse("1500.00").unwrap().as_plain_text(), "1500");
    }

    #[test]
    fn test_times_and_sum() {
        let a = Price::from_shillings(10).times(2);
        let b = Price::from_shillings(20);
        assert_eq!([a, b].into_iter().sum::<Price>(), Price::from_shillings(40));
    }

    #[test]
    fn test_huge_totals_saturate() {
        let huge = Price::new(Decimal::MAX).unwrap();
        assert_eq!(huge.times(3).amount(), Decimal::MAX);
        assert_eq!((huge + Price::from_shillings(1)).amount(), Decimal::MAX);
        assert_eq!([huge, huge].into_iter().sum::<Price>().amount(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert_eq!(
            serde_json::from_str::<Price>("12.5").unwrap(),
            Price::parse("12.5").unwrap()
        );
        assert_eq!(
            serde_json::from_str::<Price>("\"7\"").unwrap(),
            Price::from_shillings(7)
        );
    }
}
