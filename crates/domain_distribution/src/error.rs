//! Distribution domain errors

use thiserror::Error;

use core_kernel::MoneyError;

use crate::validator::DistributionViolation;

/// Errors that can occur in the distribution domain
#[derive(Debug, Error)]
pub enum DistributionError {
    /// The draft set broke one or more rules; every violation is included
    #[error("Distribution rejected with {} violation(s)", .0.len())]
    Rejected(Vec<DistributionViolation>),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl DistributionError {
    /// The violation list, empty for non-validation errors
    pub fn violations(&self) -> &[DistributionViolation] {
        match self {
            DistributionError::Rejected(violations) => violations,
            _ => &[],
        }
    }
}
