//! Upload content-type policy
//!
//! Checklist-adjacent rule, kept separate from the checklist itself: the
//! checklist only checks document presence, while the attach operation
//! enforces what formats each document kind accepts.

use domain_invoice::DocumentKind;

const PDF: &str = "application/pdf";
const IMAGES: [&str; 2] = ["image/png", "image/jpeg"];

/// Returns true if a content type is acceptable for the document kind
///
/// Purchase orders and Treasury payment supports are PDF-only; management
/// approvals additionally accept screenshots (PNG/JPEG); everything else
/// is unrestricted.
pub fn allowed_content_type(kind: DocumentKind, content_type: &str) -> bool {
    match kind {
        DocumentKind::PurchaseOrder => content_type == PDF,
        DocumentKind::ManagementApproval => {
            content_type == PDF || IMAGES.contains(&content_type)
        }
        DocumentKind::Pec | DocumentKind::Ec | DocumentKind::Pce | DocumentKind::Ped => {
            content_type == PDF
        }
        DocumentKind::InventorySupport
        | DocumentKind::InvoicePdf
        | DocumentKind::PaymentSupport => true,
    }
}
