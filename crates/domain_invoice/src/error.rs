//! Invoice domain errors

use thiserror::Error;

/// Errors that can occur in the invoice domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Invoice total must be positive, got {0}")]
    InvalidTotal(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Only the author may modify a comment")]
    NotCommentAuthor,
}
