//! Supplier Invoice Domain
//!
//! This crate implements the invoice aggregate for the payables pipeline.
//! An invoice enters the pipeline in `Received` state, owned by its
//! responsible area, and is only mutated through the workflow engine.
//!
//! # Invoice lifecycle
//!
//! ```text
//! Received -> Assigned -> InProgress -> AccountingReview -> TreasuryApproved -> Closed
//!                                   \-> Rejected (from either review desk)
//! ```
//!
//! Three independent conditional flags each unlock a sub-record, modelled as
//! tagged unions so the checklist can match on them exhaustively:
//! inventory support, supplier discrepancy (credit note), and advance payment.

pub mod invoice;
pub mod conditions;
pub mod attachment;
pub mod comment;
pub mod error;

pub use invoice::{Invoice, InvoiceStatus, Role};
pub use conditions::{
    AdvancePayment, DeliveryInterval, Discrepancy, InventoryCode, InventoryDestination,
    InventoryEntry, InventorySupport,
};
pub use attachment::{Attachment, AttachmentSet, DocumentKind};
pub use comment::Comment;
pub use error::InvoiceError;
