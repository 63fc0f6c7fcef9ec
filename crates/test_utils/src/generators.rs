//! Property-based test generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_invoice::{DeliveryInterval, DocumentKind, InventoryDestination};

/// Strategy for percentage lists that exactly partition 100.00
///
/// Produced values are positive hundredths summing to 10,000, i.e. a draft
/// set the sum rule must accept.
pub fn percentage_partition_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1u32..40u32, 1..8).prop_map(|weights| {
        let total: u64 = weights.iter().map(|w| *w as u64).sum();
        let mut remaining = 10_000u64;
        let mut parts = Vec::with_capacity(weights.len());
        for (i, w) in weights.iter().enumerate() {
            let share = if i == weights.len() - 1 {
                remaining
            } else {
                // Keep at least one hundredth for every later line
                let later = (weights.len() - 1 - i) as u64;
                ((*w as u64 * 10_000) / total)
                    .max(1)
                    .min(remaining - later)
            };
            remaining -= share;
            parts.push(Decimal::new(share as i64, 2));
        }
        parts
    })
}

/// Strategy for any document kind
pub fn document_kind_strategy() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::PurchaseOrder),
        Just(DocumentKind::ManagementApproval),
        Just(DocumentKind::InventorySupport),
        Just(DocumentKind::InvoicePdf),
        Just(DocumentKind::PaymentSupport),
        Just(DocumentKind::Pec),
        Just(DocumentKind::Ec),
        Just(DocumentKind::Pce),
        Just(DocumentKind::Ped),
    ]
}

/// Strategy for inventory destinations
pub fn inventory_destination_strategy() -> impl Strategy<Value = InventoryDestination> {
    prop_oneof![
        Just(InventoryDestination::Store),
        Just(InventoryDestination::Warehouse),
    ]
}

/// Strategy for delivery intervals
pub fn delivery_interval_strategy() -> impl Strategy<Value = DeliveryInterval> {
    prop_oneof![
        Just(DeliveryInterval::OneWeek),
        Just(DeliveryInterval::TwoWeeks),
        Just(DeliveryInterval::ThreeWeeks),
        Just(DeliveryInterval::OneMonth),
    ]
}
