//! Invoice comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CommentId, InvoiceId, UserId};

use crate::error::InvoiceError;

/// A free-text comment on an invoice
///
/// Only the author may edit or delete a comment; the orchestrator checks
/// deletion, editing is guarded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub invoice_id: InvoiceId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment
    pub fn new(
        invoice_id: InvoiceId,
        author_id: UserId,
        body: impl Into<String>,
    ) -> Result<Self, InvoiceError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(InvoiceError::MissingField("comment body"));
        }

        let now = Utc::now();
        Ok(Self {
            id: CommentId::new_v7(),
            invoice_id,
            author_id,
            body,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the body; rejected for anyone but the author
    pub fn edit(&mut self, editor: UserId, body: impl Into<String>) -> Result<(), InvoiceError> {
        if editor != self.author_id {
            return Err(InvoiceError::NotCommentAuthor);
        }
        let body = body.into();
        if body.trim().is_empty() {
            return Err(InvoiceError::MissingField("comment body"));
        }
        self.body = body;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if the user wrote this comment
    pub fn is_author(&self, user: UserId) -> bool {
        self.author_id == user
    }
}
