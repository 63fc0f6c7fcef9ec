//! Invoice aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AreaId, AuxiliaryAccountId, BusinessUnitId, CostCenterId, InvoiceId, Money,
    OperationCenterId, UserId,
};

use crate::conditions::{AdvancePayment, Discrepancy, InventorySupport};
use crate::error::InvoiceError;

/// Invoice workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Registered, waiting for assignment inside the responsible area
    Received,
    /// Assigned to a user of the responsible area
    Assigned,
    /// Being completed by the responsible area
    InProgress,
    /// At the Accounting desk
    AccountingReview,
    /// Cleared by Accounting, at the Treasury desk
    TreasuryApproved,
    /// Paid and filed
    Closed,
    /// Rejected by a review desk
    Rejected,
}

impl InvoiceStatus {
    /// The role that owns invoices in this status, if any
    pub fn owning_role(&self) -> Option<Role> {
        match self {
            InvoiceStatus::Received | InvoiceStatus::Assigned | InvoiceStatus::InProgress => {
                Some(Role::ResponsibleArea)
            }
            InvoiceStatus::AccountingReview => Some(Role::Accounting),
            InvoiceStatus::TreasuryApproved => Some(Role::Treasury),
            InvoiceStatus::Closed | InvoiceStatus::Rejected => None,
        }
    }

    /// Returns true for states the workflow never leaves
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Closed | InvoiceStatus::Rejected)
    }

    /// All statuses, in process order
    pub fn all() -> [InvoiceStatus; 7] {
        [
            InvoiceStatus::Received,
            InvoiceStatus::Assigned,
            InvoiceStatus::InProgress,
            InvoiceStatus::AccountingReview,
            InvoiceStatus::TreasuryApproved,
            InvoiceStatus::Closed,
            InvoiceStatus::Rejected,
        ]
    }
}

/// Acting role in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ResponsibleArea,
    Accounting,
    Treasury,
}

impl Role {
    pub fn all() -> [Role; 3] {
        [Role::ResponsibleArea, Role::Accounting, Role::Treasury]
    }
}

/// A supplier invoice routed through the approval pipeline
///
/// Supplier, invoice number, issue date and total are fixed at ingestion.
/// Workflow and classification fields are mutated exclusively through the
/// transition engine and orchestrator operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Supplier legal name
    pub supplier: String,
    /// Supplier's invoice number; (supplier, invoice_number) is unique
    pub invoice_number: String,
    /// Date printed on the invoice
    pub issue_date: Option<NaiveDate>,
    /// Invoice total
    pub total: Money,
    /// Payment due date
    pub due_date: Option<NaiveDate>,

    /// Workflow status
    pub status: InvoiceStatus,
    /// Area currently holding the invoice
    pub area_id: AreaId,
    /// Responsible area the invoice entered the pipeline under; returns
    /// route back here
    pub origin_area_id: AreaId,
    /// User currently assigned
    pub assigned_user_id: Option<UserId>,
    /// When the current assignment was made
    pub assigned_at: Option<DateTime<Utc>>,
    /// Reason captured by the last return, cleared on resubmission
    pub return_reason: Option<String>,

    /// Cost center, selected before submission to Accounting
    pub cost_center_id: Option<CostCenterId>,
    /// Operation center, must belong to the selected cost center
    pub operation_center_id: Option<OperationCenterId>,
    /// Optional business unit
    pub business_unit_id: Option<BusinessUnitId>,
    /// Optional auxiliary account
    pub auxiliary_account_id: Option<AuxiliaryAccountId>,

    /// Inventory-entry requirement and its codes
    pub inventory: InventorySupport,
    /// Supplier discrepancy (credit note)
    pub discrepancy: Discrepancy,
    /// Advance-payment agreement
    pub advance: AdvancePayment,
    /// Exempts the invoice from purchase-order and approval documents
    pub is_administrative_expense: bool,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Registers a newly received invoice under its responsible area
    pub fn received(
        supplier: impl Into<String>,
        invoice_number: impl Into<String>,
        issue_date: Option<NaiveDate>,
        total: Money,
        origin_area_id: AreaId,
    ) -> Result<Self, InvoiceError> {
        let supplier = supplier.into();
        let invoice_number = invoice_number.into();

        if supplier.trim().is_empty() {
            return Err(InvoiceError::MissingField("supplier"));
        }
        if invoice_number.trim().is_empty() {
            return Err(InvoiceError::MissingField("invoice_number"));
        }
        if !total.is_positive() {
            return Err(InvoiceError::InvalidTotal(total.amount().to_string()));
        }

        let now = Utc::now();
        Ok(Self {
            id: InvoiceId::new_v7(),
            supplier,
            invoice_number,
            issue_date,
            total,
            due_date: None,
            status: InvoiceStatus::Received,
            area_id: origin_area_id,
            origin_area_id,
            assigned_user_id: None,
            assigned_at: None,
            return_reason: None,
            cost_center_id: None,
            operation_center_id: None,
            business_unit_id: None,
            auxiliary_account_id: None,
            inventory: InventorySupport::NotRequired,
            discrepancy: Discrepancy::None,
            advance: AdvancePayment::None,
            is_administrative_expense: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets cost-center/operation-center classification
    pub fn classify(
        &mut self,
        cost_center_id: CostCenterId,
        operation_center_id: OperationCenterId,
    ) {
        self.cost_center_id = Some(cost_center_id);
        self.operation_center_id = Some(operation_center_id);
        self.touch();
    }

    /// Returns true once both classification centers are selected
    pub fn is_classified(&self) -> bool {
        self.cost_center_id.is_some() && self.operation_center_id.is_some()
    }

    /// Bumps the updated timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
