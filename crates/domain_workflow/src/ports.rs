//! Storage port
//!
//! The engine never talks to a database; it loads versioned dossier
//! snapshots through this port and commits updated ones back. Adapters
//! implement the port against real storage; the optimistic version check
//! is how concurrent writers are resolved.

use async_trait::async_trait;
use thiserror::Error;

use core_kernel::InvoiceId;

use crate::dossier::InvoiceDossier;

/// Monotonic snapshot version used for optimistic concurrency
pub type Version = u64;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested dossier does not exist
    #[error("Not found: invoice {0}")]
    NotFound(InvoiceId),

    /// The snapshot changed since it was loaded
    #[error("Version conflict on invoice {invoice_id}: expected {expected}, found {actual}")]
    Conflict {
        invoice_id: InvoiceId,
        expected: Version,
        actual: Version,
    },

    /// The underlying storage failed
    #[error("Storage error: {0}")]
    Internal(String),
}

/// Versioned dossier storage
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Loads a dossier snapshot with its current version
    async fn load(&self, id: InvoiceId) -> Result<(InvoiceDossier, Version), StoreError>;

    /// Registers a new dossier, returning its initial version
    async fn insert(&self, dossier: InvoiceDossier) -> Result<Version, StoreError>;

    /// Commits an updated dossier if the version still matches
    ///
    /// All side effects of a transition travel in the one dossier value,
    /// so the commit is atomic: either the whole snapshot replaces the old
    /// one or a `Conflict` is returned and nothing changes.
    async fn commit(
        &self,
        expected: Version,
        dossier: InvoiceDossier,
    ) -> Result<Version, StoreError>;
}
