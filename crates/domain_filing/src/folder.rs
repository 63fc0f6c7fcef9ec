//! Folder tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use core_kernel::{FolderId, InvoiceId, UserId};

use crate::error::FilingError;

/// A treasury folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
    /// Direct children, maintained by the tree
    pub children: BTreeSet<FolderId>,
    /// Invoices filed directly in this folder
    pub invoices: BTreeSet<InvoiceId>,
    /// Storage reference of the optional summary PDF
    pub summary_ref: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    fn new(name: String, parent_id: Option<FolderId>, created_by: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new_v7(),
            name,
            parent_id,
            children: BTreeSet::new(),
            invoices: BTreeSet::new(),
            summary_ref: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The folder tree, indexed by folder id
///
/// Each invoice is filed in at most one folder. The parent relation is a
/// tree: reparenting that would introduce a cycle is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderTree {
    folders: HashMap<FolderId, Folder>,
    filed: HashMap<InvoiceId, FolderId>,
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a folder, optionally under an existing parent
    pub fn create(
        &mut self,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
        created_by: Option<UserId>,
    ) -> Result<FolderId, FilingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FilingError::EmptyName);
        }
        if let Some(parent) = parent_id {
            if !self.folders.contains_key(&parent) {
                return Err(FilingError::ParentNotFound(parent.to_string()));
            }
        }

        let folder = Folder::new(name, parent_id, created_by);
        let id = folder.id;
        self.folders.insert(id, folder);
        if let Some(parent) = parent_id {
            if let Some(p) = self.folders.get_mut(&parent) {
                p.children.insert(id);
            }
        }
        Ok(id)
    }

    /// Renames a folder
    pub fn rename(&mut self, id: FolderId, name: impl Into<String>) -> Result<(), FilingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FilingError::EmptyName);
        }
        let folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| FilingError::FolderNotFound(id.to_string()))?;
        folder.name = name;
        folder.updated_at = Utc::now();
        Ok(())
    }

    /// Moves a folder under a new parent (or to the root)
    ///
    /// Rejects unknown parents and any move that would make the folder a
    /// descendant of itself.
    pub fn set_parent(
        &mut self,
        id: FolderId,
        new_parent: Option<FolderId>,
    ) -> Result<(), FilingError> {
        if !self.folders.contains_key(&id) {
            return Err(FilingError::FolderNotFound(id.to_string()));
        }
        if let Some(parent) = new_parent {
            if !self.folders.contains_key(&parent) {
                return Err(FilingError::ParentNotFound(parent.to_string()));
            }
            if self.would_create_cycle(id, parent) {
                return Err(FilingError::CycleDetected {
                    folder: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        let old_parent = self.folders.get(&id).and_then(|f| f.parent_id);
        if let Some(old) = old_parent {
            if let Some(p) = self.folders.get_mut(&old) {
                p.children.remove(&id);
            }
        }
        if let Some(parent) = new_parent {
            if let Some(p) = self.folders.get_mut(&parent) {
                p.children.insert(id);
            }
        }
        if let Some(folder) = self.folders.get_mut(&id) {
            folder.parent_id = new_parent;
            folder.updated_at = Utc::now();
        }
        Ok(())
    }

    /// Deletes a folder and its entire subtree; filed invoices become
    /// unfiled
    pub fn delete(&mut self, id: FolderId) -> Result<(), FilingError> {
        if !self.folders.contains_key(&id) {
            return Err(FilingError::FolderNotFound(id.to_string()));
        }

        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(folder) = self.folders.get(&to_remove[i]) {
                to_remove.extend(folder.children.iter().copied());
            }
            i += 1;
        }

        if let Some(parent) = self.folders.get(&id).and_then(|f| f.parent_id) {
            if let Some(p) = self.folders.get_mut(&parent) {
                p.children.remove(&id);
            }
        }
        for folder_id in to_remove {
            if let Some(folder) = self.folders.remove(&folder_id) {
                for invoice in folder.invoices {
                    self.filed.remove(&invoice);
                }
            }
        }
        Ok(())
    }

    /// Files an invoice in a folder, or unfiles it when `folder` is `None`
    ///
    /// An invoice lives in at most one folder; filing moves it.
    pub fn assign_invoice(
        &mut self,
        invoice: InvoiceId,
        folder: Option<FolderId>,
    ) -> Result<(), FilingError> {
        if let Some(target) = folder {
            if !self.folders.contains_key(&target) {
                return Err(FilingError::FolderNotFound(target.to_string()));
            }
        }

        if let Some(previous) = self.filed.remove(&invoice) {
            if let Some(f) = self.folders.get_mut(&previous) {
                f.invoices.remove(&invoice);
                f.updated_at = Utc::now();
            }
        }
        if let Some(target) = folder {
            if let Some(f) = self.folders.get_mut(&target) {
                f.invoices.insert(invoice);
                f.updated_at = Utc::now();
            }
            self.filed.insert(invoice, target);
        }
        Ok(())
    }

    /// Attaches (or replaces) the folder's summary PDF reference
    pub fn attach_summary(
        &mut self,
        id: FolderId,
        storage_ref: impl Into<String>,
    ) -> Result<(), FilingError> {
        let folder = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| FilingError::FolderNotFound(id.to_string()))?;
        folder.summary_ref = Some(storage_ref.into());
        folder.updated_at = Utc::now();
        Ok(())
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// The folder an invoice is filed in, if any
    pub fn folder_of(&self, invoice: InvoiceId) -> Option<FolderId> {
        self.filed.get(&invoice).copied()
    }

    /// Root folders, i.e. folders without a parent
    pub fn roots(&self) -> Vec<&Folder> {
        self.folders.values().filter(|f| f.parent_id.is_none()).collect()
    }

    /// Direct invoice references plus the recursive sum over children
    pub fn total_invoice_count(&self, id: FolderId) -> Result<usize, FilingError> {
        let folder = self
            .folders
            .get(&id)
            .ok_or_else(|| FilingError::FolderNotFound(id.to_string()))?;

        let mut count = folder.invoices.len();
        for child in &folder.children {
            count += self.total_invoice_count(*child)?;
        }
        Ok(count)
    }

    /// Case-insensitive substring search over folder names
    pub fn search(&self, query: &str) -> Vec<&Folder> {
        let query = query.to_lowercase();
        let mut hits: Vec<&Folder> = self
            .folders
            .values()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// Walks from `candidate_parent` to the root; reaching `folder` means
    /// the move would close a cycle
    fn would_create_cycle(&self, folder: FolderId, candidate_parent: FolderId) -> bool {
        let mut cursor = Some(candidate_parent);
        while let Some(current) = cursor {
            if current == folder {
                return true;
            }
            cursor = self.folders.get(&current).and_then(|f| f.parent_id);
        }
        false
    }
}
