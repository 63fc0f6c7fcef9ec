//! Test data builders
//!
//! Builder patterns for constructing test invoices and dossiers with
//! sensible defaults, so tests specify only the fields they care about.

use rust_decimal_macros::dec;

use core_kernel::{AreaId, Money};
use domain_distribution::{validate, DistributionDraft};
use domain_invoice::{
    AdvancePayment, Attachment, Discrepancy, DocumentKind, InventorySupport, Invoice,
    InvoiceStatus,
};
use domain_workflow::InvoiceDossier;

use crate::fixtures::{catalog_fixture, pipeline_fixture, MoneyFixtures, StringFixtures};

/// Builder for test invoices
pub struct InvoiceBuilder {
    supplier: String,
    invoice_number: String,
    total: Money,
    origin_area_id: AreaId,
    status: InvoiceStatus,
    administrative: bool,
    inventory: InventorySupport,
    discrepancy: Discrepancy,
    advance: AdvancePayment,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    pub fn new() -> Self {
        Self {
            supplier: StringFixtures::supplier().to_string(),
            invoice_number: StringFixtures::invoice_number().to_string(),
            total: MoneyFixtures::cop_invoice_total(),
            origin_area_id: pipeline_fixture().responsible_area,
            status: InvoiceStatus::Received,
            administrative: false,
            inventory: InventorySupport::NotRequired,
            discrepancy: Discrepancy::None,
            advance: AdvancePayment::None,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    pub fn with_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    pub fn with_total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    pub fn with_origin_area(mut self, area: AreaId) -> Self {
        self.origin_area_id = area;
        self
    }

    /// Places the invoice directly into a workflow status
    pub fn in_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn administrative_expense(mut self, flag: bool) -> Self {
        self.administrative = flag;
        self
    }

    pub fn with_inventory(mut self, inventory: InventorySupport) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_discrepancy(mut self, discrepancy: Discrepancy) -> Self {
        self.discrepancy = discrepancy;
        self
    }

    pub fn with_advance(mut self, advance: AdvancePayment) -> Self {
        self.advance = advance;
        self
    }

    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::received(
            self.supplier,
            self.invoice_number,
            None,
            self.total,
            self.origin_area_id,
        )
        .expect("builder defaults must produce a valid invoice");

        invoice.status = self.status;
        invoice.is_administrative_expense = self.administrative;
        invoice.inventory = self.inventory;
        invoice.discrepancy = self.discrepancy;
        invoice.advance = self.advance;
        if self.status != InvoiceStatus::Received {
            invoice.assigned_user_id = Some(pipeline_fixture().responsible.user_id);
        }
        invoice
    }
}

/// Builder for complete invoice dossiers
pub struct DossierBuilder {
    invoice: Invoice,
    attachment_kinds: Vec<DocumentKind>,
    distribution: Option<Vec<DistributionDraft>>,
}

impl Default for DossierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DossierBuilder {
    pub fn new() -> Self {
        Self {
            invoice: InvoiceBuilder::new().build(),
            attachment_kinds: Vec::new(),
            distribution: None,
        }
    }

    pub fn with_invoice(mut self, invoice: Invoice) -> Self {
        self.invoice = invoice;
        self
    }

    /// Selects classification centers from the shared catalog
    pub fn classified(mut self) -> Self {
        let catalog = catalog_fixture();
        self.invoice
            .classify(catalog.maintenance_cc, catalog.maintenance_north);
        self
    }

    /// Attaches one document of the given kind
    pub fn with_document(mut self, kind: DocumentKind) -> Self {
        self.attachment_kinds.push(kind);
        self
    }

    /// Adds a valid 60/40 distribution over the shared catalog
    pub fn with_complete_distribution(mut self) -> Self {
        let catalog = catalog_fixture();
        self.distribution = Some(vec![
            DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_north, dec!(60)),
            DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_south, dec!(40)),
        ]);
        self
    }

    /// Adds a custom distribution draft set
    pub fn with_distribution(mut self, drafts: Vec<DistributionDraft>) -> Self {
        self.distribution = Some(drafts);
        self
    }

    /// Everything the submission checklist wants: classification, purchase
    /// order, management approval, and a complete distribution
    pub fn submission_ready(self) -> Self {
        self.classified()
            .with_document(DocumentKind::PurchaseOrder)
            .with_document(DocumentKind::ManagementApproval)
            .with_complete_distribution()
    }

    pub fn build(self) -> InvoiceDossier {
        let uploader = pipeline_fixture().responsible.user_id;
        let invoice_id = self.invoice.id;
        let mut dossier = InvoiceDossier::new(self.invoice);

        for (i, kind) in self.attachment_kinds.into_iter().enumerate() {
            let content_type = "application/pdf";
            dossier.attachments.push(Attachment::new(
                invoice_id,
                kind,
                format!("{}-{i}.pdf", kind.tag().to_lowercase()),
                content_type,
                format!("payables/{invoice_id}/{}-{i}.pdf", kind.tag().to_lowercase()),
                uploader,
            ));
        }

        if let Some(drafts) = self.distribution {
            dossier.distribution = validate(invoice_id, &drafts, &catalog_fixture().catalog)
                .expect("builder distribution must validate");
        }

        dossier
    }
}

/// Convenience: a dossier that satisfies the submission checklist, parked
/// in the given status
pub fn ready_dossier(status: InvoiceStatus) -> InvoiceDossier {
    DossierBuilder::new()
        .with_invoice(InvoiceBuilder::new().in_status(status).build())
        .submission_ready()
        .build()
}
