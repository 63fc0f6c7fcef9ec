//! Core error types used across the system

use thiserror::Error;
use crate::money::MoneyError;
use crate::percent::PercentError;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Percent error: {0}")]
    Percent(#[from] PercentError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidStateTransition(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors() {
        assert!(matches!(
            CoreError::validation("bad input"),
            CoreError::Validation(_)
        ));
        assert!(matches!(
            CoreError::invalid_state("cannot close a rejected invoice"),
            CoreError::InvalidStateTransition(_)
        ));
        assert!(matches!(
            CoreError::not_found("invoice"),
            CoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_from_money_error() {
        let error = MoneyError::CurrencyMismatch("COP".to_string(), "USD".to_string());
        let core: CoreError = error.into();
        assert!(core.to_string().contains("Currency mismatch"));
    }

    #[test]
    fn test_from_percent_error() {
        let error = PercentError::OutOfRange(dec!(120));
        let core: CoreError = error.into();
        assert!(core.to_string().contains("120"));
    }
}
