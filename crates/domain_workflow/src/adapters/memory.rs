//! In-memory store adapter
//!
//! Backs tests and demos; real deployments put a transactional database
//! behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use core_kernel::InvoiceId;

use crate::dossier::InvoiceDossier;
use crate::ports::{InvoiceStore, StoreError, Version};

/// Mutex-protected dossier map with per-invoice versions
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    dossiers: Mutex<HashMap<InvoiceId, (InvoiceDossier, Version)>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<InvoiceId, (InvoiceDossier, Version)>>, StoreError> {
        self.dossiers
            .lock()
            .map_err(|_| StoreError::Internal("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn load(&self, id: InvoiceId) -> Result<(InvoiceDossier, Version), StoreError> {
        let dossiers = self.lock()?;
        dossiers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, dossier: InvoiceDossier) -> Result<Version, StoreError> {
        let mut dossiers = self.lock()?;
        let id = dossier.invoice_id();
        if dossiers.contains_key(&id) {
            return Err(StoreError::Internal(format!(
                "invoice {id} already registered"
            )));
        }
        dossiers.insert(id, (dossier, 1));
        Ok(1)
    }

    async fn commit(
        &self,
        expected: Version,
        dossier: InvoiceDossier,
    ) -> Result<Version, StoreError> {
        let mut dossiers = self.lock()?;
        let id = dossier.invoice_id();
        let entry = dossiers.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if entry.1 != expected {
            return Err(StoreError::Conflict {
                invoice_id: id,
                expected,
                actual: entry.1,
            });
        }
        *entry = (dossier, expected + 1);
        Ok(expected + 1)
    }
}
