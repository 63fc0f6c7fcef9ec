//! Workflow error taxonomy
//!
//! Every failure is a typed, recoverable business-rule rejection returned
//! to the caller; the engine never throws past its validation context and
//! never retries internally.

use thiserror::Error;

use core_kernel::InvoiceId;
use domain_distribution::{DistributionError, DistributionViolation};
use domain_invoice::{InvoiceError, InvoiceStatus, Role};

use crate::checklist::UnmetRequirement;
use crate::ports::StoreError;

/// Errors returned by the transition engine and orchestrator
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// One or more checklist rules are unmet; the complete list is carried
    #[error("Validation failed with {} unmet requirement(s)", .0.len())]
    Validation(Vec<UnmetRequirement>),

    /// The (status, role, action) triple is not in the transition table
    #[error("Action '{action}' is not allowed for role {role:?} in status {status:?}")]
    IllegalTransition {
        status: InvoiceStatus,
        role: Role,
        action: &'static str,
    },

    /// The distribution draft set broke one or more rules; referential
    /// center mismatches are reported here alongside the other violations
    #[error("Distribution rejected with {} violation(s)", .0.len())]
    Distribution(Vec<DistributionViolation>),

    /// The snapshot changed between evaluation and commit
    #[error("Invoice {0} changed underneath; reload and retry")]
    Conflict(InvoiceId),

    /// The document's content type is not accepted for its kind
    #[error("Content type '{content_type}' is not accepted for {kind}")]
    UnsupportedContentType { kind: &'static str, content_type: String },

    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl WorkflowError {
    /// The unmet-requirement list, empty for other error classes
    pub fn unmet(&self) -> &[UnmetRequirement] {
        match self {
            WorkflowError::Validation(unmet) => unmet,
            _ => &[],
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => WorkflowError::NotFound(id),
            StoreError::Conflict { invoice_id, .. } => WorkflowError::Conflict(invoice_id),
            StoreError::Internal(message) => WorkflowError::Storage(message),
        }
    }
}

impl From<DistributionError> for WorkflowError {
    fn from(error: DistributionError) -> Self {
        match error {
            DistributionError::Rejected(violations) => WorkflowError::Distribution(violations),
            DistributionError::Money(e) => WorkflowError::Storage(e.to_string()),
        }
    }
}
