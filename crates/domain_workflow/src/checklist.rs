//! Checklist evaluation
//!
//! Computes, for an invoice dossier and a target gate, the ordered list of
//! unmet requirements. Rules are evaluated independently and unioned; each
//! failure yields a stable code plus a human-readable message. The
//! evaluator is pure so the UI can preview missing items at any time.

use serde::{Deserialize, Serialize};

use core_kernel::Percent;
use domain_invoice::{
    AdvancePayment, Discrepancy, DocumentKind, InventorySupport,
};

use crate::dossier::InvoiceDossier;

/// The transition a checklist protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistGate {
    /// Responsible area sending the invoice to Accounting
    SubmitToAccounting,
    /// Accounting clearing the invoice for Treasury
    AccountingApproval,
    /// Treasury closing the invoice
    TreasuryFinalize,
}

/// Stable identifiers for checklist rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCode {
    PurchaseOrderAttached,
    ManagementApprovalAttached,
    CentersSelected,
    InventoryComplete,
    CreditNoteRegistered,
    AdvanceValid,
    DistributionComplete,
    TreasuryDocumentAttached,
    /// Return/reject reasons must carry enough detail
    ReturnReason,
}

/// One failed checklist rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    pub code: RequirementCode,
    pub message: String,
}

impl UnmetRequirement {
    pub fn new(code: RequirementCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The evaluation result for one gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistReport {
    pub gate: ChecklistGate,
    pub unmet: Vec<UnmetRequirement>,
}

impl ChecklistReport {
    /// True when every rule passed
    pub fn is_satisfied(&self) -> bool {
        self.unmet.is_empty()
    }

    /// Codes of the failed rules, in evaluation order
    pub fn unmet_codes(&self) -> Vec<RequirementCode> {
        self.unmet.iter().map(|u| u.code).collect()
    }
}

/// Evaluates the checklist for a gate over an immutable dossier snapshot
pub fn evaluate(dossier: &InvoiceDossier, gate: ChecklistGate) -> ChecklistReport {
    let unmet = match gate {
        ChecklistGate::SubmitToAccounting | ChecklistGate::AccountingApproval => {
            completeness_rules(dossier)
        }
        ChecklistGate::TreasuryFinalize => treasury_rules(dossier),
    };

    ChecklistReport { gate, unmet }
}

/// Document and classification rules shared by the submission and approval
/// gates
fn completeness_rules(dossier: &InvoiceDossier) -> Vec<UnmetRequirement> {
    let invoice = &dossier.invoice;
    let attachments = &dossier.attachments;
    let mut unmet = Vec::new();

    // Administrative expenses are exempt from purchase-order and approval
    // documents; every other rule still applies.
    if !invoice.is_administrative_expense {
        if !attachments.has(DocumentKind::PurchaseOrder) {
            unmet.push(UnmetRequirement::new(
                RequirementCode::PurchaseOrderAttached,
                "Purchase order (OC/OS) is missing",
            ));
        }
        if !attachments.has(DocumentKind::ManagementApproval) {
            unmet.push(UnmetRequirement::new(
                RequirementCode::ManagementApprovalAttached,
                "Management approval is missing",
            ));
        }
    }

    if !invoice.is_classified() {
        unmet.push(UnmetRequirement::new(
            RequirementCode::CentersSelected,
            "Cost center and operation center must both be selected",
        ));
    }

    if let InventorySupport::Required(entry) = &invoice.inventory {
        let mut problems = Vec::new();
        match entry.destination {
            None => problems.push("destination not chosen".to_string()),
            Some(_) => {
                let missing = entry.missing_codes();
                if !missing.is_empty() {
                    let tags: Vec<&str> = missing.iter().map(|c| c.tag()).collect();
                    problems.push(format!("missing codes {}", tags.join(", ")));
                }
            }
        }
        if !attachments.has(DocumentKind::InventorySupport) {
            problems.push("support document not attached".to_string());
        }
        if !problems.is_empty() {
            unmet.push(UnmetRequirement::new(
                RequirementCode::InventoryComplete,
                format!("Inventory entry incomplete: {}", problems.join("; ")),
            ));
        }
    }

    if let Discrepancy::Reported { credit_note } = &invoice.discrepancy {
        if credit_note.trim().is_empty() {
            unmet.push(UnmetRequirement::new(
                RequirementCode::CreditNoteRegistered,
                "Credit note (NP) number is missing",
            ));
        }
    }

    if let AdvancePayment::Agreed { percentage, .. } = &invoice.advance {
        if Percent::parse(percentage).is_err() {
            unmet.push(UnmetRequirement::new(
                RequirementCode::AdvanceValid,
                format!("Advance percentage must be a number between 0 and 100, got {percentage:?}"),
            ));
        }
    }

    // The distribution requirement is never relaxed, administrative
    // expense or not.
    if dossier.distribution.is_empty() {
        unmet.push(UnmetRequirement::new(
            RequirementCode::DistributionComplete,
            "Cost distribution has not been entered; it must sum to 100%",
        ));
    } else if !dossier.distribution.is_complete() {
        unmet.push(UnmetRequirement::new(
            RequirementCode::DistributionComplete,
            format!(
                "Cost distribution sums to {}%, expected 100%",
                dossier.distribution.total_percentage()
            ),
        ));
    }

    unmet
}

fn treasury_rules(dossier: &InvoiceDossier) -> Vec<UnmetRequirement> {
    let mut unmet = Vec::new();
    if !dossier.attachments.has_any(&DocumentKind::TREASURY) {
        unmet.push(UnmetRequirement::new(
            RequirementCode::TreasuryDocumentAttached,
            "At least one Treasury document (PEC, EC, PCE or PED) must be attached",
        ));
    }
    unmet
}
