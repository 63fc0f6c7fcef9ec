//! Treasury Filing Domain
//!
//! Closed invoices may be organized into a tree of named folders. Filing is
//! pure tagging: it never touches invoice workflow state. The tree is kept
//! as an id-indexed map so cycle detection and recursive counting stay
//! cheap, and every reparenting is checked against the tree invariant
//! (parent ids arrive from the outside and cannot be trusted).

pub mod folder;
pub mod error;

pub use folder::{Folder, FolderTree};
pub use error::FilingError;
