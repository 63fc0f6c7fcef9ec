//! Workflow orchestrator
//!
//! One operation per business action used by the interface layer. Every
//! operation loads a versioned dossier, decides purely, and commits with an
//! optimistic version check; a stale snapshot surfaces as a conflict the
//! caller resolves by reloading.

use tracing::{info, warn};

use core_kernel::{
    AreaId, AttachmentId, CommentId, CostCenterId, InvoiceId, OperationCenterId, UserId,
};
use domain_distribution::{validate, CostCenterCatalog, DistributionDraft};
use domain_invoice::{
    Attachment, Comment, DocumentKind, Invoice, InvoiceError, InvoiceStatus, Role,
};

use crate::checklist::{self, ChecklistGate, ChecklistReport};
use crate::dossier::InvoiceDossier;
use crate::error::WorkflowError;
use crate::ports::InvoiceStore;
use crate::transition::{decide, Actor, InvoiceAction, RoutingDirectory};
use crate::upload_policy::allowed_content_type;

/// The workflow orchestrator
///
/// Holds the storage port and the routing directory; all business
/// decisions are delegated to the pure checklist and transition functions.
pub struct WorkflowService<S: InvoiceStore> {
    store: S,
    routing: RoutingDirectory,
}

impl<S: InvoiceStore> WorkflowService<S> {
    pub fn new(store: S, routing: RoutingDirectory) -> Self {
        Self { store, routing }
    }

    /// The underlying store, for read access in tests and adapters
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers an externally created invoice in `Received` state
    pub async fn register(&self, invoice: Invoice) -> Result<InvoiceDossier, WorkflowError> {
        let dossier = InvoiceDossier::new(invoice);
        self.store.insert(dossier.clone()).await?;
        info!(invoice_id = %dossier.invoice_id(), "invoice registered");
        Ok(dossier)
    }

    /// Assigns a received invoice to a user of its responsible area
    pub async fn assign(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        area_id: AreaId,
        user_id: UserId,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(invoice_id, actor, InvoiceAction::Assign { area_id, user_id })
            .await
    }

    /// Starts work on an assigned invoice
    pub async fn start(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(invoice_id, actor, InvoiceAction::Start).await
    }

    /// Sends a completed invoice to the Accounting desk
    pub async fn submit(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(invoice_id, actor, InvoiceAction::SubmitToAccounting)
            .await
    }

    /// Accounting clears the invoice and routes it to Treasury
    pub async fn approve(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(invoice_id, actor, InvoiceAction::Approve).await
    }

    /// Accounting sends the invoice back to its responsible area
    pub async fn return_to_responsible(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        reason: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(
            invoice_id,
            actor,
            InvoiceAction::ReturnToResponsible {
                reason: reason.into(),
            },
        )
        .await
    }

    /// The responsible area hands the invoice back to invoicing
    pub async fn return_to_invoicing(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        reason: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(
            invoice_id,
            actor,
            InvoiceAction::ReturnToInvoicing {
                reason: reason.into(),
            },
        )
        .await
    }

    /// A review desk rejects the invoice outright
    pub async fn reject(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        reason: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(
            invoice_id,
            actor,
            InvoiceAction::Reject {
                reason: reason.into(),
            },
        )
        .await
    }

    /// Treasury closes the paid invoice
    pub async fn finalize(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
    ) -> Result<InvoiceDossier, WorkflowError> {
        self.transition(invoice_id, actor, InvoiceAction::Finalize).await
    }

    /// Evaluates a checklist speculatively, without touching state
    pub async fn preview_checklist(
        &self,
        invoice_id: InvoiceId,
        gate: ChecklistGate,
    ) -> Result<ChecklistReport, WorkflowError> {
        let (dossier, _) = self.store.load(invoice_id).await?;
        Ok(checklist::evaluate(&dossier, gate))
    }

    /// Validates and transactionally replaces the invoice's distribution
    ///
    /// Only the responsible area may edit the distribution, and only while
    /// it still owns the invoice; downstream desks read it frozen.
    pub async fn save_distribution(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        drafts: &[DistributionDraft],
        catalog: &dyn CostCenterCatalog,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        ensure_responsible_edit(&dossier.invoice, &actor, "save_distribution")?;

        let accepted = validate(invoice_id, drafts, catalog).map_err(|e| {
            warn!(invoice_id = %invoice_id, "distribution rejected");
            WorkflowError::from(e)
        })?;

        dossier.distribution = accepted;
        dossier.invoice.touch();
        self.store.commit(version, dossier.clone()).await?;
        info!(invoice_id = %invoice_id, lines = dossier.distribution.lines().len(),
            "distribution replaced");
        Ok(dossier)
    }

    /// Selects the invoice's header-level classification centers
    pub async fn classify(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        cost_center_id: CostCenterId,
        operation_center_id: OperationCenterId,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        ensure_responsible_edit(&dossier.invoice, &actor, "classify")?;

        dossier.invoice.classify(cost_center_id, operation_center_id);
        self.store.commit(version, dossier.clone()).await?;
        info!(invoice_id = %invoice_id, "classification centers selected");
        Ok(dossier)
    }

    /// Flips the administrative-expense exemption
    pub async fn toggle_administrative_expense(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        flag: bool,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        ensure_responsible_edit(&dossier.invoice, &actor, "toggle_administrative_expense")?;

        dossier.invoice.is_administrative_expense = flag;
        dossier.invoice.touch();
        self.store.commit(version, dossier.clone()).await?;
        info!(invoice_id = %invoice_id, flag, "administrative-expense flag updated");
        Ok(dossier)
    }

    /// Attaches a document, enforcing the content-type policy
    pub async fn attach_document(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        kind: DocumentKind,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        storage_ref: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let content_type = content_type.into();
        if !allowed_content_type(kind, &content_type) {
            return Err(WorkflowError::UnsupportedContentType {
                kind: kind.tag(),
                content_type,
            });
        }

        let (mut dossier, version) = self.store.load(invoice_id).await?;
        let attachment = Attachment::new(
            invoice_id,
            kind,
            filename,
            content_type,
            storage_ref,
            actor.user_id,
        );
        dossier.attachments.push(attachment);
        self.store.commit(version, dossier.clone()).await?;
        info!(invoice_id = %invoice_id, kind = kind.tag(), "document attached");
        Ok(dossier)
    }

    /// Detaches a document by id
    pub async fn remove_document(
        &self,
        invoice_id: InvoiceId,
        attachment_id: AttachmentId,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        if dossier.attachments.remove(attachment_id).is_none() {
            return Err(InvoiceError::AttachmentNotFound(attachment_id.to_string()).into());
        }
        self.store.commit(version, dossier.clone()).await?;
        info!(invoice_id = %invoice_id, attachment_id = %attachment_id, "document removed");
        Ok(dossier)
    }

    /// Adds a comment
    pub async fn add_comment(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        body: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        let comment = Comment::new(invoice_id, actor.user_id, body)?;
        dossier.comments.push(comment);
        self.store.commit(version, dossier.clone()).await?;
        Ok(dossier)
    }

    /// Edits a comment; only the author may do so
    pub async fn edit_comment(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        comment_id: CommentId,
        body: impl Into<String>,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        let comment = dossier
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| InvoiceError::CommentNotFound(comment_id.to_string()))?;
        comment.edit(actor.user_id, body)?;
        self.store.commit(version, dossier.clone()).await?;
        Ok(dossier)
    }

    /// Deletes a comment; only the author may do so
    pub async fn delete_comment(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        comment_id: CommentId,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        let position = dossier
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| InvoiceError::CommentNotFound(comment_id.to_string()))?;
        if !dossier.comments[position].is_author(actor.user_id) {
            return Err(InvoiceError::NotCommentAuthor.into());
        }
        dossier.comments.remove(position);
        self.store.commit(version, dossier.clone()).await?;
        Ok(dossier)
    }

    /// Shared transition path: load, decide purely, commit atomically
    async fn transition(
        &self,
        invoice_id: InvoiceId,
        actor: Actor,
        action: InvoiceAction,
    ) -> Result<InvoiceDossier, WorkflowError> {
        let (mut dossier, version) = self.store.load(invoice_id).await?;
        let action_name = action.kind().name();

        match decide(&dossier, &actor, &action, &self.routing) {
            Ok(updated) => {
                let from = dossier.invoice.status;
                dossier.invoice = updated;
                self.store.commit(version, dossier.clone()).await?;
                info!(
                    invoice_id = %invoice_id,
                    action = action_name,
                    from = ?from,
                    to = ?dossier.invoice.status,
                    "transition applied"
                );
                Ok(dossier)
            }
            Err(error) => {
                warn!(
                    invoice_id = %invoice_id,
                    action = action_name,
                    error = %error,
                    "transition rejected"
                );
                Err(error)
            }
        }
    }
}

/// Distribution and flag edits stay with the responsible area until
/// submission
fn ensure_responsible_edit(
    invoice: &Invoice,
    actor: &Actor,
    operation: &'static str,
) -> Result<(), WorkflowError> {
    let owned_by_responsible = matches!(
        invoice.status,
        InvoiceStatus::Received | InvoiceStatus::Assigned | InvoiceStatus::InProgress
    );
    if !owned_by_responsible || actor.role != Role::ResponsibleArea {
        return Err(WorkflowError::IllegalTransition {
            status: invoice.status,
            role: actor.role,
            action: operation,
        });
    }
    Ok(())
}
