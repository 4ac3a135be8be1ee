//! Type-safe voucher amount in Korean won.
//!
//! Vouchers are denominated in whole won, so the amount is a positive integer
//! rather than a decimal. Zero and negative amounts cannot be constructed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing a [`Won`] amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The amount was zero or negative.
    #[error("amount must be greater than zero (got {0})")]
    NotPositive(i64),

    /// The amount could not be parsed as an integer.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// A positive amount of Korean won.
///
/// Serializes as a bare JSON number; deserialization rejects non-positive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Won(u64);

impl Won {
    /// Create a new amount.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::NotPositive` if `amount` is zero or negative.
    pub const fn new(amount: i64) -> Result<Self, AmountError> {
        if amount <= 0 {
            return Err(AmountError::NotPositive(amount));
        }
        #[allow(clippy::cast_sign_loss)] // checked positive above
        let amount = amount as u64;
        Ok(Self(amount))
    }

    /// Get the amount as a plain number of won.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Format the number with thousands separators (e.g. `4,500`).
    #[must_use]
    pub fn grouped(&self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

impl TryFrom<i64> for Won {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Won> for i64 {
    fn from(won: Won) -> Self {
        i64::try_from(won.0).unwrap_or(Self::MAX)
    }
}

impl std::str::FromStr for Won {
    type Err = AmountError;

    /// Parse digits with optional thousands separators and `원` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_end_matches('원')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let value = cleaned
            .trim()
            .parse::<i64>()
            .map_err(|_| AmountError::Invalid(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Won {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}원", self.grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_rejects_zero_and_negative() {
        assert_eq!(Won::new(0), Err(AmountError::NotPositive(0)));
        assert_eq!(Won::new(-500), Err(AmountError::NotPositive(-500)));
    }

    #[test]
    fn test_won_display_groups_thousands() {
        assert_eq!(Won::new(4500).expect("amount").to_string(), "4,500원");
        assert_eq!(Won::new(10000).expect("amount").to_string(), "10,000원");
        assert_eq!(Won::new(1_234_567).expect("amount").to_string(), "1,234,567원");
        assert_eq!(Won::new(900).expect("amount").to_string(), "900원");
    }

    #[test]
    fn test_won_parses_formatted_strings() {
        assert_eq!("4,500원".parse::<Won>().expect("parse").get(), 4500);
        assert_eq!(" 10000 ".parse::<Won>().expect("parse").get(), 10000);
        assert!("0".parse::<Won>().is_err());
        assert!("abc".parse::<Won>().is_err());
    }

    #[test]
    fn test_won_deserialize_rejects_non_positive() {
        assert!(serde_json::from_str::<Won>("0").is_err());
        assert_eq!(serde_json::from_str::<Won>("8900").expect("won").get(), 8900);
    }
}
