//! Invoice dossier snapshot

use serde::{Deserialize, Serialize};

use core_kernel::InvoiceId;
use domain_distribution::AcceptedDistribution;
use domain_invoice::{AttachmentSet, Comment, Invoice};

/// Everything the engine needs to know about one invoice
///
/// The storage layer materializes a dossier per invoice; the engine reads
/// it immutably and returns updated copies for the caller to commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDossier {
    pub invoice: Invoice,
    pub attachments: AttachmentSet,
    pub distribution: AcceptedDistribution,
    pub comments: Vec<Comment>,
}

impl InvoiceDossier {
    /// Wraps a freshly received invoice with no attachments, comments, or
    /// distribution yet
    pub fn new(invoice: Invoice) -> Self {
        let distribution = AcceptedDistribution::empty(invoice.id);
        Self {
            invoice,
            attachments: AttachmentSet::new(),
            distribution,
            comments: Vec::new(),
        }
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice.id
    }
}
