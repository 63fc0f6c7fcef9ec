//! Core Kernel - Foundational types for the payables pipeline
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money and Percent types with precise decimal arithmetic
//! - Strongly-typed identifiers and value objects
//! - Common error types

pub mod money;
pub mod percent;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use percent::{Percent, PercentError};
pub use identifiers::{
    InvoiceId, AreaId, UserId, AttachmentId, CommentId,
    CostCenterId, OperationCenterId, BusinessUnitId, AuxiliaryAccountId,
    DistributionLineId, FolderId,
};
pub use error::CoreError;
