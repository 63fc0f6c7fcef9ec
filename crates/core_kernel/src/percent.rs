//! Percentage value object
//!
//! A `Percent` is a decimal in `0..=100` carried with two-decimal precision,
//! used for advance-payment agreements and cost-distribution weights.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::money::Money;

/// Errors that can occur constructing a percentage
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentError {
    #[error("Percentage must be between 0 and 100, got {0}")]
    OutOfRange(Decimal),

    #[error("Not a valid percentage: {0}")]
    Unparseable(String),
}

/// A percentage in `0..=100`, two-decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a percentage, rejecting values outside `0..=100`
    ///
    /// The value is rounded to two decimal places.
    pub fn new(value: Decimal) -> Result<Self, PercentError> {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(PercentError::OutOfRange(value));
        }
        Ok(Self(value.round_dp(2)))
    }

    /// Parses a percentage from user-entered text
    pub fn parse(input: &str) -> Result<Self, PercentError> {
        let value = Decimal::from_str(input.trim())
            .map_err(|_| PercentError::Unparseable(input.to_string()))?;
        Self::new(value)
    }

    /// The full 100% value
    pub fn hundred() -> Self {
        Self(dec!(100))
    }

    /// Returns the percentage value (e.g. `35.50` for 35.5%)
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the percentage as a ratio (e.g. `0.355` for 35.5%)
    pub fn as_ratio(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// Applies this percentage to a money amount
    pub fn of(&self, money: &Money) -> Money {
        money.multiply(self.as_ratio())
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
