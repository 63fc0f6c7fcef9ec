//! Invoice attachments
//!
//! The core tracks attachment metadata only; bytes live behind an opaque
//! storage reference owned by the file-storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AttachmentId, InvoiceId, UserId};

/// Document type tags attachable to an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Purchase order / service order (OC/OS)
    PurchaseOrder,
    /// Management approval of the purchase
    ManagementApproval,
    /// Proof of the inventory entry
    InventorySupport,
    /// The invoice itself as PDF
    InvoicePdf,
    /// Generic payment support
    PaymentSupport,
    /// Treasury: proof of electronic payment
    Pec,
    /// Treasury: bank statement extract
    Ec,
    /// Treasury: payment confirmation
    Pce,
    /// Treasury: payment dispersion
    Ped,
}

impl DocumentKind {
    /// Storage tag for the document type
    pub fn tag(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "OC_OS",
            DocumentKind::ManagementApproval => "APROBACION_GERENCIA",
            DocumentKind::InventorySupport => "SOPORTE_INVENTARIO",
            DocumentKind::InvoicePdf => "FACTURA_PDF",
            DocumentKind::PaymentSupport => "SOPORTE_PAGO",
            DocumentKind::Pec => "PEC",
            DocumentKind::Ec => "EC",
            DocumentKind::Pce => "PCE",
            DocumentKind::Ped => "PED",
        }
    }

    /// Purchase orders may accumulate; every other kind keeps one current
    /// document (latest upload wins for checklist purposes)
    pub fn allows_multiple(&self) -> bool {
        matches!(self, DocumentKind::PurchaseOrder)
    }

    /// Returns true for the Treasury payment-support kinds
    pub fn is_treasury(&self) -> bool {
        matches!(
            self,
            DocumentKind::Pec | DocumentKind::Ec | DocumentKind::Pce | DocumentKind::Ped
        )
    }

    /// The four payment-support kinds, at least one of which must be
    /// attached before closure
    pub const TREASURY: [DocumentKind; 4] = [
        DocumentKind::Pec,
        DocumentKind::Ec,
        DocumentKind::Pce,
        DocumentKind::Ped,
    ];
}

/// Attachment metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub invoice_id: InvoiceId,
    pub kind: DocumentKind,
    pub filename: String,
    pub content_type: String,
    /// Opaque key into the external file store
    pub storage_ref: String,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(
        invoice_id: InvoiceId,
        kind: DocumentKind,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        storage_ref: impl Into<String>,
        uploaded_by: UserId,
    ) -> Self {
        Self {
            id: AttachmentId::new_v7(),
            invoice_id,
            kind,
            filename: filename.into(),
            content_type: content_type.into(),
            storage_ref: storage_ref.into(),
            uploaded_by,
            uploaded_at: Utc::now(),
        }
    }
}

/// The full attachment history of one invoice
///
/// All uploads are retained; for singleton kinds the latest upload is the
/// "current" document the checklist sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSet {
    attachments: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an upload
    pub fn push(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Removes an attachment by id, returning it if present
    pub fn remove(&mut self, id: AttachmentId) -> Option<Attachment> {
        let pos = self.attachments.iter().position(|a| a.id == id)?;
        Some(self.attachments.remove(pos))
    }

    /// The current document of a kind (latest upload)
    pub fn current(&self, kind: DocumentKind) -> Option<&Attachment> {
        self.attachments
            .iter()
            .filter(|a| a.kind == kind)
            .max_by_key(|a| a.uploaded_at)
    }

    /// Every retained upload of a kind, oldest first
    pub fn all_of(&self, kind: DocumentKind) -> Vec<&Attachment> {
        self.attachments.iter().filter(|a| a.kind == kind).collect()
    }

    /// Returns true if at least one document of the kind is attached
    pub fn has(&self, kind: DocumentKind) -> bool {
        self.attachments.iter().any(|a| a.kind == kind)
    }

    /// Returns true if at least one document of any of the kinds is attached
    pub fn has_any(&self, kinds: &[DocumentKind]) -> bool {
        kinds.iter().any(|k| self.has(*k))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter()
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(invoice_id: InvoiceId, kind: DocumentKind, name: &str) -> Attachment {
        Attachment::new(
            invoice_id,
            kind,
            name,
            "application/pdf",
            format!("payables/{name}"),
            UserId::new(),
        )
    }

    #[test]
    fn test_latest_upload_is_current() {
        let invoice_id = InvoiceId::new();
        let mut set = AttachmentSet::new();

        let mut first = attachment(invoice_id, DocumentKind::ManagementApproval, "v1.pdf");
        first.uploaded_at = Utc::now() - chrono::Duration::minutes(5);
        set.push(first);
        set.push(attachment(invoice_id, DocumentKind::ManagementApproval, "v2.pdf"));

        assert_eq!(set.current(DocumentKind::ManagementApproval).unwrap().filename, "v2.pdf");
        // History is retained
        assert_eq!(set.all_of(DocumentKind::ManagementApproval).len(), 2);
    }

    #[test]
    fn test_multiple_purchase_orders_coexist() {
        let invoice_id = InvoiceId::new();
        let mut set = AttachmentSet::new();
        set.push(attachment(invoice_id, DocumentKind::PurchaseOrder, "oc-1.pdf"));
        set.push(attachment(invoice_id, DocumentKind::PurchaseOrder, "oc-2.pdf"));

        assert!(DocumentKind::PurchaseOrder.allows_multiple());
        assert_eq!(set.all_of(DocumentKind::PurchaseOrder).len(), 2);
    }

    #[test]
    fn test_has_any_treasury_kind() {
        let invoice_id = InvoiceId::new();
        let mut set = AttachmentSet::new();
        assert!(!set.has_any(&DocumentKind::TREASURY));

        set.push(attachment(invoice_id, DocumentKind::Pec, "pec.pdf"));
        assert!(set.has_any(&DocumentKind::TREASURY));
    }

    #[test]
    fn test_remove_by_id() {
        let invoice_id = InvoiceId::new();
        let mut set = AttachmentSet::new();
        let att = attachment(invoice_id, DocumentKind::InvoicePdf, "factura.pdf");
        let id = att.id;
        set.push(att);

        assert!(set.remove(id).is_some());
        assert!(set.is_empty());
        assert!(set.remove(id).is_none());
    }
}
