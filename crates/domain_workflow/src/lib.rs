//! Invoice Workflow Domain
//!
//! The lifecycle engine of the payables pipeline. Three pieces compose:
//!
//! - **Checklist evaluator**: pure function computing the unmet
//!   requirements that gate a transition, callable speculatively.
//! - **Transition engine**: pure decision from (snapshot, actor, action)
//!   to a new snapshot or a typed rejection; the caller commits atomically.
//! - **Workflow orchestrator**: one operation per business action, loading
//!   a versioned dossier from the storage port and committing with an
//!   optimistic version check.
//!
//! No shared mutable state lives inside the engine; every decision takes an
//! immutable dossier snapshot and returns a fresh one.

pub mod dossier;
pub mod checklist;
pub mod transition;
pub mod upload_policy;
pub mod service;
pub mod ports;
pub mod adapters;
pub mod error;

pub use dossier::InvoiceDossier;
pub use checklist::{
    evaluate, ChecklistGate, ChecklistReport, RequirementCode, UnmetRequirement,
};
pub use transition::{
    decide, is_legal, ActionKind, Actor, InvoiceAction, Route, RoutingDirectory,
    MIN_RETURN_REASON_LEN,
};
pub use upload_policy::allowed_content_type;
pub use service::WorkflowService;
pub use ports::{InvoiceStore, StoreError, Version};
pub use error::WorkflowError;
