//! Conditional invoice sub-records
//!
//! Each of the three independent flags on an invoice unlocks a payload,
//! modelled as a tagged union so the checklist evaluator can match on the
//! active variant instead of probing loose optional fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where inventory-tracked goods are received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InventoryDestination {
    Store,
    Warehouse,
}

impl InventoryDestination {
    /// The code set this destination makes mandatory
    ///
    /// Exactly one destination is active at a time, so the other
    /// destination's codes are never required.
    pub fn required_codes(&self) -> [InventoryCode; 3] {
        match self {
            InventoryDestination::Store => {
                [InventoryCode::Oct, InventoryCode::Ect, InventoryCode::Fpc]
            }
            InventoryDestination::Warehouse => {
                [InventoryCode::Occ, InventoryCode::Edo, InventoryCode::Fpc]
            }
        }
    }
}

/// Typed inventory entry codes
///
/// OCT/ECT belong to store receipts, OCC/EDO to warehouse receipts,
/// FPC to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InventoryCode {
    Oct,
    Ect,
    Occ,
    Edo,
    Fpc,
}

impl InventoryCode {
    /// Short tag used on documents and in the UI
    pub fn tag(&self) -> &'static str {
        match self {
            InventoryCode::Oct => "OCT",
            InventoryCode::Ect => "ECT",
            InventoryCode::Occ => "OCC",
            InventoryCode::Edo => "EDO",
            InventoryCode::Fpc => "FPC",
        }
    }
}

/// Inventory-entry requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventorySupport {
    /// Goods are not inventory-tracked
    NotRequired,
    /// Goods must be entered into inventory before submission
    Required(InventoryEntry),
}

impl InventorySupport {
    /// Starts an empty requirement with no destination chosen yet
    pub fn required() -> Self {
        InventorySupport::Required(InventoryEntry::default())
    }

    pub fn is_required(&self) -> bool {
        matches!(self, InventorySupport::Required(_))
    }
}

/// Draft inventory data filled in by the responsible area
///
/// Codes are collected as entered; completeness against the chosen
/// destination is the checklist evaluator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub destination: Option<InventoryDestination>,
    pub codes: BTreeMap<InventoryCode, String>,
}

impl InventoryEntry {
    /// Creates an entry for a destination with the given code values
    pub fn with_destination(destination: InventoryDestination) -> Self {
        Self {
            destination: Some(destination),
            codes: BTreeMap::new(),
        }
    }

    /// Records a code value, replacing any previous value
    pub fn set_code(&mut self, code: InventoryCode, value: impl Into<String>) {
        self.codes.insert(code, value.into());
    }

    /// Returns the value for a code if present and non-blank
    pub fn code(&self, code: InventoryCode) -> Option<&str> {
        self.codes
            .get(&code)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Codes the chosen destination still misses
    ///
    /// Empty when no destination is chosen; the missing destination itself
    /// is reported separately.
    pub fn missing_codes(&self) -> Vec<InventoryCode> {
        match self.destination {
            Some(destination) => destination
                .required_codes()
                .into_iter()
                .filter(|c| self.code(*c).is_none())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Supplier discrepancy on the delivered goods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// Goods received as invoiced
    None,
    /// Wrong or damaged product; the supplier issues a credit note
    Reported { credit_note: String },
}

impl Discrepancy {
    /// Document code the credit-note number is registered under
    pub const CODE: &'static str = "NP";

    pub fn is_reported(&self) -> bool {
        matches!(self, Discrepancy::Reported { .. })
    }
}

/// Advance-payment agreement with the supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvancePayment {
    /// No advance agreed
    None,
    /// A share of the total is paid before delivery
    Agreed {
        /// Percentage as entered; must parse to a decimal in 0..=100
        percentage: String,
        /// Expected delivery interval after the advance
        delivery_interval: DeliveryInterval,
    },
}

impl AdvancePayment {
    pub fn is_agreed(&self) -> bool {
        matches!(self, AdvancePayment::Agreed { .. })
    }
}

/// Delivery interval agreed for advance payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryInterval {
    OneWeek,
    TwoWeeks,
    ThreeWeeks,
    OneMonth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_warehouse_code_sets() {
        assert_eq!(
            InventoryDestination::Store.required_codes(),
            [InventoryCode::Oct, InventoryCode::Ect, InventoryCode::Fpc]
        );
        assert_eq!(
            InventoryDestination::Warehouse.required_codes(),
            [InventoryCode::Occ, InventoryCode::Edo, InventoryCode::Fpc]
        );
    }

    #[test]
    fn test_missing_codes_tracks_only_chosen_destination() {
        let mut entry = InventoryEntry::with_destination(InventoryDestination::Store);
        entry.set_code(InventoryCode::Oct, "OCT-991");

        let missing = entry.missing_codes();
        assert_eq!(missing, vec![InventoryCode::Ect, InventoryCode::Fpc]);

        // Warehouse codes are irrelevant while Store is chosen
        entry.set_code(InventoryCode::Occ, "OCC-1");
        assert_eq!(entry.missing_codes(), vec![InventoryCode::Ect, InventoryCode::Fpc]);
    }

    #[test]
    fn test_blank_code_counts_as_missing() {
        let mut entry = InventoryEntry::with_destination(InventoryDestination::Warehouse);
        entry.set_code(InventoryCode::Occ, "  ");
        assert!(entry.missing_codes().contains(&InventoryCode::Occ));
    }

    #[test]
    fn test_no_destination_reports_no_missing_codes() {
        let entry = InventoryEntry::default();
        assert!(entry.missing_codes().is_empty());
    }

    #[test]
    fn test_condition_serde_tags() {
        let inv = InventorySupport::required();
        let json = serde_json::to_string(&inv).unwrap();
        assert!(json.contains("\"kind\":\"required\""));

        let adv = AdvancePayment::Agreed {
            percentage: "30".to_string(),
            delivery_interval: DeliveryInterval::TwoWeeks,
        };
        let json = serde_json::to_string(&adv).unwrap();
        assert!(json.contains("TWO_WEEKS"));
    }
}
