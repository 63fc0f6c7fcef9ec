//! Distribution lines

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AuxiliaryAccountId, BusinessUnitId, CostCenterId, DistributionLineId, InvoiceId, Money,
    MoneyError, OperationCenterId,
};

/// A distribution row as edited by the responsible area
///
/// Selections may be incomplete while the row is being drafted; the
/// validator turns a complete draft set into accepted lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionDraft {
    pub cost_center_id: Option<CostCenterId>,
    pub operation_center_id: Option<OperationCenterId>,
    pub business_unit_id: Option<BusinessUnitId>,
    pub auxiliary_account_id: Option<AuxiliaryAccountId>,
    /// Percentage weight, two-decimal precision, `0 < p <= 100`
    pub percentage: Decimal,
}

impl DistributionDraft {
    /// Convenience constructor for the common fully-selected case
    pub fn new(
        cost_center_id: CostCenterId,
        operation_center_id: OperationCenterId,
        percentage: Decimal,
    ) -> Self {
        Self {
            cost_center_id: Some(cost_center_id),
            operation_center_id: Some(operation_center_id),
            business_unit_id: None,
            auxiliary_account_id: None,
            percentage,
        }
    }
}

/// An accepted distribution line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionLine {
    pub id: DistributionLineId,
    pub invoice_id: InvoiceId,
    pub cost_center_id: CostCenterId,
    pub operation_center_id: OperationCenterId,
    pub business_unit_id: Option<BusinessUnitId>,
    pub auxiliary_account_id: Option<AuxiliaryAccountId>,
    pub percentage: Decimal,
    pub created_at: DateTime<Utc>,
}

/// The accepted distribution of one invoice
///
/// Replaces the previous set wholesale when validation passes; downstream
/// desks read it but never edit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedDistribution {
    invoice_id: InvoiceId,
    lines: Vec<DistributionLine>,
}

impl AcceptedDistribution {
    /// An invoice with no classification yet
    pub fn empty(invoice_id: InvoiceId) -> Self {
        Self {
            invoice_id,
            lines: Vec::new(),
        }
    }

    pub(crate) fn from_lines(invoice_id: InvoiceId, lines: Vec<DistributionLine>) -> Self {
        Self { invoice_id, lines }
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn lines(&self) -> &[DistributionLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line percentages
    pub fn total_percentage(&self) -> Decimal {
        self.lines.iter().map(|l| l.percentage).sum()
    }

    /// True when lines exist and their percentages sum to 100% within the
    /// validator's tolerance
    pub fn is_complete(&self) -> bool {
        !self.lines.is_empty()
            && (self.total_percentage() - Decimal::ONE_HUNDRED).abs()
                <= crate::validator::SUM_TOLERANCE
    }

    /// Splits an invoice total across the lines by their percentages
    ///
    /// The last line absorbs the rounding remainder so the amounts re-sum
    /// to the invoice total.
    pub fn distribute(
        &self,
        total: Money,
    ) -> Result<Vec<(DistributionLineId, Money)>, MoneyError> {
        if self.lines.is_empty() {
            return Ok(Vec::new());
        }
        let ratios: Vec<Decimal> = self.lines.iter().map(|l| l.percentage).collect();
        let amounts = total.allocate_by_ratios(&ratios)?;
        Ok(self
            .lines
            .iter()
            .map(|l| l.id)
            .zip(amounts)
            .collect())
    }
}
