//! Money type for representing currency amounts
//!
//! Amounts are stored as whole currency units (i64). Petty-cash funds are
//! handled in pesos, which have no minor unit, so integer storage avoids any
//! floating-point drift in totals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

/// Error returned when parsing a money amount fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "invalid amount: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

impl Money {
    /// Create a Money amount from whole units
    ///
    /// # Examples
    /// ```
    /// use rendicion::models::Money;
    /// let amount = Money::from_units(15000);
    /// assert_eq!(amount.to_string(), "$15.000");
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Create a Money amount from a float, rounding to the nearest unit
    pub fn from_f64_rounded(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(value.round() as i64))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in whole units
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add, returning `None` on overflow
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Subtract, returning `None` on overflow
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Sum of `amounts`, or `None` if the running total overflows
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Parse a money amount from user input
    ///
    /// Accepts `15000`, `$15.000` (dot thousands), `15000.0`, `1.234,5`
    /// (decimal comma). Fractions are rounded to the nearest unit.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.trim().to_string());
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let rest: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
        if rest.is_empty() {
            return Err(invalid());
        }

        let normalized = if rest.contains(',') {
            // Decimal comma: dots can only be thousands separators
            rest.replace('.', "").replacen(',', ".", 1)
        } else if is_dot_grouped(&rest) {
            rest.replace('.', "")
        } else {
            rest
        };

        if !normalized
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(invalid());
        }

        let value: f64 = normalized.parse().map_err(|_| invalid())?;
        let amount = Self::from_f64_rounded(value).ok_or_else(invalid)?;
        Ok(if negative { -amount } else { amount })
    }

    /// Format with a currency symbol and dot thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if self.is_negative() {
            format!("{}-{}", symbol, grouped)
        } else {
            format!("{}{}", symbol, grouped)
        }
    }
}

/// `1.234.567` style grouping: a 1-3 digit head followed by 3-digit groups
fn is_dot_grouped(s: &str) -> bool {
    let mut parts = s.split('.');
    let head = parts.next().unwrap_or("");
    let tail: Vec<&str> = parts.collect();
    !tail.is_empty()
        && (1..=3).contains(&head.len())
        && tail.iter().all(|g| g.len() == 3)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "$0");
        assert_eq!(Money::from_units(950).to_string(), "$950");
        assert_eq!(Money::from_units(15000).to_string(), "$15.000");
        assert_eq!(Money::from_units(1234567).to_string(), "$1.234.567");
        assert_eq!(Money::from_units(-5000).to_string(), "$-5.000");
    }

    #[test]
    fn test_parse_plain_and_grouped() {
        assert_eq!(Money::parse("15000").unwrap().units(), 15000);
        assert_eq!(Money::parse("$15.000").unwrap().units(), 15000);
        assert_eq!(Money::parse("1.234.567").unwrap().units(), 1234567);
        assert_eq!(Money::parse(" 2 500 ").unwrap().units(), 2500);
    }

    #[test]
    fn test_parse_decimals_round() {
        assert_eq!(Money::parse("15000.0").unwrap().units(), 15000);
        assert_eq!(Money::parse("1.5").unwrap().units(), 2);
        assert_eq!(Money::parse("1.234,5").unwrap().units(), 1235);
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Money::parse("-300").unwrap().units(), -300);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12a").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_units(20000);
        let b = Money::from_units(5000);
        assert_eq!((a + b).units(), 25000);
        assert_eq!((a - b).units(), 15000);
        let total: Money = [a, b].iter().sum();
        assert_eq!(total.units(), 25000);
    }

    #[test]
    fn test_checked_sum_detects_overflow() {
        let big = Money::from_units(5_000_000_000_000_000_000);
        assert_eq!(Money::checked_sum([big, big]), None);
        assert_eq!(
            Money::checked_sum([Money::from_units(2), Money::from_units(3)]),
            Some(Money::from_units(5))
        );
        assert_eq!(Money::checked_sum([]), Some(Money::zero()));
        assert_eq!(big.saturating_add(big).units(), i64::MAX);
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Money::from_f64_rounded(f64::NAN).is_none());
        assert_eq!(Money::from_f64_rounded(99.5).unwrap().units(), 100);
    }
}
