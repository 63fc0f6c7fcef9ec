//! Transition engine
//!
//! The state machine of the pipeline. `decide` is a pure function: it takes
//! an immutable dossier snapshot, the acting user, the requested action and
//! the routing directory, and returns the updated invoice snapshot or a
//! typed rejection. The caller applies the result atomically; re-applying a
//! committed transition fails the from-state guard, so a stale retry is a
//! no-op rejection rather than a double apply.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{AreaId, UserId};
use domain_invoice::{Invoice, InvoiceStatus, Role};

use crate::checklist::{self, ChecklistGate, RequirementCode, UnmetRequirement};
use crate::dossier::InvoiceDossier;
use crate::error::WorkflowError;

/// Minimum length of a return/reject reason
pub const MIN_RETURN_REASON_LEN: u64 = 10;

/// The acting user, as supplied by the session collaborator
///
/// Identity is trusted; this engine only enforces role gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// A routing destination: the desk an invoice is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub area_id: AreaId,
    pub user_id: UserId,
}

/// Where submissions and approvals are routed
///
/// Supplied by the caller; destinations are configuration, not engine
/// constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDirectory {
    pub accounting: Route,
    pub treasury: Route,
}

/// A requested workflow action with its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvoiceAction {
    /// Assign the received invoice to a user of the responsible area
    Assign { area_id: AreaId, user_id: UserId },
    /// Start completing the assigned invoice
    Start,
    /// Send the completed invoice to Accounting
    SubmitToAccounting,
    /// Accounting clears the invoice for Treasury
    Approve,
    /// Accounting sends the invoice back for corrections
    ReturnToResponsible { reason: String },
    /// Responsible area hands the invoice back to invoicing, pre-submission
    ReturnToInvoicing { reason: String },
    /// A review desk rejects the invoice outright
    Reject { reason: String },
    /// Treasury closes the paid invoice
    Finalize,
}

impl InvoiceAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            InvoiceAction::Assign { .. } => ActionKind::Assign,
            InvoiceAction::Start => ActionKind::Start,
            InvoiceAction::SubmitToAccounting => ActionKind::SubmitToAccounting,
            InvoiceAction::Approve => ActionKind::Approve,
            InvoiceAction::ReturnToResponsible { .. } => ActionKind::ReturnToResponsible,
            InvoiceAction::ReturnToInvoicing { .. } => ActionKind::ReturnToInvoicing,
            InvoiceAction::Reject { .. } => ActionKind::Reject,
            InvoiceAction::Finalize => ActionKind::Finalize,
        }
    }
}

/// Action discriminant used by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Assign,
    Start,
    SubmitToAccounting,
    Approve,
    ReturnToResponsible,
    ReturnToInvoicing,
    Reject,
    Finalize,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Assign => "assign",
            ActionKind::Start => "start",
            ActionKind::SubmitToAccounting => "submit_to_accounting",
            ActionKind::Approve => "approve",
            ActionKind::ReturnToResponsible => "return_to_responsible",
            ActionKind::ReturnToInvoicing => "return_to_invoicing",
            ActionKind::Reject => "reject",
            ActionKind::Finalize => "finalize",
        }
    }

    pub fn all() -> [ActionKind; 8] {
        [
            ActionKind::Assign,
            ActionKind::Start,
            ActionKind::SubmitToAccounting,
            ActionKind::Approve,
            ActionKind::ReturnToResponsible,
            ActionKind::ReturnToInvoicing,
            ActionKind::Reject,
            ActionKind::Finalize,
        ]
    }
}

/// Reason payload for returns and rejections
#[derive(Debug, Clone, Validate)]
pub struct ReturnRequest {
    #[validate(length(min = 10, message = "Reason must be at least 10 characters"))]
    pub reason: String,
}

/// The transition table: which (status, role, action) triples are legal
pub fn is_legal(status: InvoiceStatus, role: Role, action: ActionKind) -> bool {
    use ActionKind::*;
    use InvoiceStatus::*;
    use Role::*;

    matches!(
        (status, role, action),
        (Received, ResponsibleArea, Assign)
            | (Assigned, ResponsibleArea, Start)
            | (InProgress, ResponsibleArea, SubmitToAccounting)
            | (AccountingReview, Accounting, Approve)
            | (AccountingReview, Accounting, ReturnToResponsible)
            | (AccountingReview, Accounting, Reject)
            | (TreasuryApproved, Treasury, Reject)
            | (TreasuryApproved, Treasury, Finalize)
            | (Assigned, ResponsibleArea, ReturnToInvoicing)
            | (InProgress, ResponsibleArea, ReturnToInvoicing)
    )
}

/// The checklist gate protecting a transition, if any
fn gate_for(action: ActionKind) -> Option<ChecklistGate> {
    match action {
        ActionKind::SubmitToAccounting => Some(ChecklistGate::SubmitToAccounting),
        ActionKind::Approve => Some(ChecklistGate::AccountingApproval),
        ActionKind::Finalize => Some(ChecklistGate::TreasuryFinalize),
        _ => None,
    }
}

/// Decides a transition over an immutable dossier snapshot
///
/// Returns the updated invoice on success. The rejection carries either
/// the complete unmet-requirement list or the illegal (status, role,
/// action) triple; nothing is partially applied.
pub fn decide(
    dossier: &InvoiceDossier,
    actor: &Actor,
    action: &InvoiceAction,
    routing: &RoutingDirectory,
) -> Result<Invoice, WorkflowError> {
    let invoice = &dossier.invoice;
    let kind = action.kind();

    if !is_legal(invoice.status, actor.role, kind) {
        return Err(WorkflowError::IllegalTransition {
            status: invoice.status,
            role: actor.role,
            action: kind.name(),
        });
    }

    if let Some(gate) = gate_for(kind) {
        let report = checklist::evaluate(dossier, gate);
        if !report.is_satisfied() {
            return Err(WorkflowError::Validation(report.unmet));
        }
    }

    if let Some(reason) = action_reason(action) {
        let request = ReturnRequest {
            reason: reason.trim().to_string(),
        };
        if request.validate().is_err() {
            return Err(WorkflowError::Validation(vec![UnmetRequirement::new(
                RequirementCode::ReturnReason,
                format!("Reason must be at least {MIN_RETURN_REASON_LEN} characters"),
            )]));
        }
    }

    let mut next = invoice.clone();
    match action {
        InvoiceAction::Assign { area_id, user_id } => {
            next.status = InvoiceStatus::Assigned;
            next.area_id = *area_id;
            next.assigned_user_id = Some(*user_id);
            next.assigned_at = Some(Utc::now());
        }
        InvoiceAction::Start => {
            next.status = InvoiceStatus::InProgress;
        }
        InvoiceAction::SubmitToAccounting => {
            next.status = InvoiceStatus::AccountingReview;
            next.area_id = routing.accounting.area_id;
            next.assigned_user_id = Some(routing.accounting.user_id);
            next.assigned_at = Some(Utc::now());
            next.return_reason = None;
        }
        InvoiceAction::Approve => {
            next.status = InvoiceStatus::TreasuryApproved;
            next.area_id = routing.treasury.area_id;
            next.assigned_user_id = Some(routing.treasury.user_id);
            next.assigned_at = Some(Utc::now());
        }
        InvoiceAction::ReturnToResponsible { reason } => {
            next.status = InvoiceStatus::InProgress;
            next.area_id = invoice.origin_area_id;
            next.assigned_user_id = None;
            next.assigned_at = None;
            next.return_reason = Some(reason.trim().to_string());
        }
        InvoiceAction::ReturnToInvoicing { reason } => {
            next.status = InvoiceStatus::Received;
            next.area_id = invoice.origin_area_id;
            next.assigned_user_id = None;
            next.assigned_at = None;
            next.return_reason = Some(reason.trim().to_string());
        }
        InvoiceAction::Reject { reason } => {
            next.status = InvoiceStatus::Rejected;
            next.return_reason = Some(reason.trim().to_string());
        }
        InvoiceAction::Finalize => {
            next.status = InvoiceStatus::Closed;
        }
    }
    next.touch();

    Ok(next)
}

fn action_reason(action: &InvoiceAction) -> Option<&str> {
    match action {
        InvoiceAction::ReturnToResponsible { reason }
        | InvoiceAction::ReturnToInvoicing { reason }
        | InvoiceAction::Reject { reason } => Some(reason.as_str()),
        _ => None,
    }
}
