//! Money types with precise decimal arithmetic
//!
//! Estimate amounts are carried as `rust_decimal::Decimal`, which has no
//! NaN or infinity representation. Amounts shown to claimants are whole
//! currency units, so this module also owns increment rounding and the
//! grouped display format used by the calculator pages.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
    AUD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "C$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::AUD => "A$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid rounding increment: {0}")]
    InvalidIncrement(Decimal),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value, keeping at most 4 decimal places
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates a whole-unit amount, rounding half away from zero
    pub fn whole(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            currency,
        }
    }

    /// Converts a float amount, rejecting NaN and infinities
    pub fn try_from_f64(amount: f64, currency: Currency) -> Result<Self, MoneyError> {
        if !amount.is_finite() {
            return Err(MoneyError::InvalidAmount(amount.to_string()));
        }
        let decimal = Decimal::try_from(amount)
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(decimal, currency))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the amount has no fractional part
    pub fn is_whole(&self) -> bool {
        self.amount.fract().is_zero()
    }

    /// Rounds to the nearest multiple of `increment` (half away from zero)
    ///
    /// An increment of 1 rounds to whole currency units; the crane
    /// calculator rounds to the nearest thousand.
    pub fn round_to_increment(&self, increment: Decimal) -> Result<Self, MoneyError> {
        if increment <= Decimal::ZERO {
            return Err(MoneyError::InvalidIncrement(increment));
        }
        let steps = self
            .amount
            .checked_div(increment)
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let amount = steps.checked_mul(increment).ok_or(MoneyError::Overflow)?;
        Ok(Self {
            amount,
            currency: self.currency,
        })
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Formats the amount the way the calculator pages display it:
    /// currency symbol, thousands separators, no fractional digits.
    ///
    /// `Money::whole(dec!(272250), Currency::USD)` renders as `$272,250`.
    pub fn to_display_string(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let digits = rounded.abs().trunc().to_string();
        format!("{}{}{}", sign, self.currency.symbol(), group_thousands(&digits))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

/// Inserts a comma between every group of three integer digits
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            return write!(f, "{}", self.to_display_string());
        }
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_whole_rounds_half_away_from_zero() {
        assert_eq!(Money::whole(dec!(2.5), Currency::USD).amount(), dec!(3));
        assert_eq!(Money::whole(dec!(2.49), Currency::USD).amount(), dec!(2));
    }

    #[test]
    fn test_round_to_thousand() {
        let m = Money::new(dec!(152499), Currency::USD);
        assert_eq!(m.round_to_increment(dec!(1000)).unwrap().amount(), dec!(152000));

        let m = Money::new(dec!(152500), Currency::USD);
        assert_eq!(m.round_to_increment(dec!(1000)).unwrap().amount(), dec!(153000));
    }

    #[test]
    fn test_round_rejects_zero_increment() {
        let m = Money::new(dec!(10), Currency::USD);
        assert!(matches!(
            m.round_to_increment(dec!(0)),
            Err(MoneyError::InvalidIncrement(_))
        ));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("272250"), "272,250");
        assert_eq!(group_thousands("1234567890"), "1,234,567,890");
    }

    #[test]
    fn test_try_from_f64_rejects_nan() {
        assert!(Money::try_from_f64(f64::NAN, Currency::USD).is_err());
        assert!(Money::try_from_f64(f64::INFINITY, Currency::USD).is_err());
    }
}
