//! Distribution validation
//!
//! Validates a candidate draft set in rule order: per-line center
//! selection, catalog membership, percentage range and precision, then the
//! 100% sum. All violations are collected and returned together, tagged by
//! line, so the caller can surface every problem at once.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{DistributionLineId, InvoiceId};

use crate::catalog::CostCenterCatalog;
use crate::error::DistributionError;
use crate::line::{AcceptedDistribution, DistributionDraft, DistributionLine};

/// Allowed deviation of the percentage sum from 100%, absorbing
/// two-decimal rounding
pub const SUM_TOLERANCE: Decimal = dec!(0.01);

/// The rule a draft set broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationRule {
    MissingCostCenter,
    MissingOperationCenter,
    /// Operation center does not belong to the line's cost center
    CenterMismatch,
    PercentageOutOfRange,
    PercentagePrecision,
    SumMismatch,
}

/// A single validation failure, tagged with the offending line when the
/// rule is line-scoped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionViolation {
    /// Zero-based index into the submitted draft list; `None` for
    /// set-level rules
    pub line: Option<usize>,
    pub rule: ViolationRule,
    pub message: String,
}

impl DistributionViolation {
    fn for_line(line: usize, rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            rule,
            message: message.into(),
        }
    }

    fn for_set(rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            line: None,
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for DistributionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line + 1, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Validates a draft set against the catalog
///
/// On success returns the accepted set that transactionally replaces the
/// invoice's current lines. An empty draft list is accepted and yields the
/// empty (not-yet-classified) distribution. On failure every violation is
/// returned, never just the first.
pub fn validate(
    invoice_id: InvoiceId,
    drafts: &[DistributionDraft],
    catalog: &dyn CostCenterCatalog,
) -> Result<AcceptedDistribution, DistributionError> {
    if drafts.is_empty() {
        return Ok(AcceptedDistribution::empty(invoice_id));
    }

    let now = Utc::now();
    let mut violations = Vec::new();
    let mut accepted: Vec<DistributionLine> = Vec::with_capacity(drafts.len());

    for (i, draft) in drafts.iter().enumerate() {
        if draft.cost_center_id.is_none() {
            violations.push(DistributionViolation::for_line(
                i,
                ViolationRule::MissingCostCenter,
                "Cost center is required",
            ));
        }
        if draft.operation_center_id.is_none() {
            violations.push(DistributionViolation::for_line(
                i,
                ViolationRule::MissingOperationCenter,
                "Operation center is required",
            ));
        }

        if let (Some(cc), Some(co)) = (draft.cost_center_id, draft.operation_center_id) {
            if catalog.belongs_to(co, cc) {
                accepted.push(DistributionLine {
                    id: DistributionLineId::new_v7(),
                    invoice_id,
                    cost_center_id: cc,
                    operation_center_id: co,
                    business_unit_id: draft.business_unit_id,
                    auxiliary_account_id: draft.auxiliary_account_id,
                    percentage: draft.percentage,
                    created_at: now,
                });
            } else {
                violations.push(DistributionViolation::for_line(
                    i,
                    ViolationRule::CenterMismatch,
                    format!("Operation center {co} does not belong to cost center {cc}"),
                ));
            }
        }

        if draft.percentage <= Decimal::ZERO || draft.percentage > Decimal::ONE_HUNDRED {
            violations.push(DistributionViolation::for_line(
                i,
                ViolationRule::PercentageOutOfRange,
                format!(
                    "Percentage must be greater than 0 and at most 100, got {}",
                    draft.percentage
                ),
            ));
        } else if draft.percentage != draft.percentage.round_dp(2) {
            violations.push(DistributionViolation::for_line(
                i,
                ViolationRule::PercentagePrecision,
                format!(
                    "Percentage carries more than two decimals: {}",
                    draft.percentage
                ),
            ));
        }
    }

    let total: Decimal = drafts.iter().map(|d| d.percentage).sum();
    if (total - Decimal::ONE_HUNDRED).abs() > SUM_TOLERANCE {
        violations.push(DistributionViolation::for_set(
            ViolationRule::SumMismatch,
            format!("Percentages must sum to 100%, got {total}%"),
        ));
    }

    if !violations.is_empty() {
        return Err(DistributionError::Rejected(violations));
    }

    // No violations means every draft produced an accepted line
    Ok(AcceptedDistribution::from_lines(invoice_id, accepted))
}
