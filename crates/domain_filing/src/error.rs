//! Filing domain errors

use thiserror::Error;

/// Errors that can occur in the filing domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilingError {
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),

    #[error("Moving folder {folder} under {parent} would create a cycle")]
    CycleDetected { folder: String, parent: String },

    #[error("Folder name must not be empty")]
    EmptyName,
}
