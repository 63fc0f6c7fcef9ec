//! Cost Distribution Domain
//!
//! Every invoice leaving the responsible area carries a percentage-based
//! distribution over cost-center/operation-center pairs. The invariant is
//! simple and absolute: the accepted set is empty (not yet classified) or
//! sums to exactly 100% within a ±0.01 rounding tolerance.
//!
//! Drafts come from the editing UI with possibly-incomplete selections; the
//! validator checks every rule over every line and reports the complete
//! violation list, so the caller can render all errors at once.

pub mod line;
pub mod catalog;
pub mod validator;
pub mod error;

pub use line::{AcceptedDistribution, DistributionDraft, DistributionLine};
pub use catalog::{CostCenterCatalog, InMemoryCatalog};
pub use validator::{validate, DistributionViolation, ViolationRule, SUM_TOLERANCE};
pub use error::DistributionError;
