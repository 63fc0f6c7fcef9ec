//! Cost-center catalog
//!
//! Operation centers hang off a cost center; a distribution line must only
//! combine centers that actually belong together. The catalog answers that
//! membership question; loading it is the storage layer's concern.

use std::collections::{HashMap, HashSet};

use core_kernel::{CostCenterId, OperationCenterId};

/// Membership lookup for cost-center/operation-center pairs
pub trait CostCenterCatalog {
    /// Returns true if the cost center exists
    fn cost_center_exists(&self, cost_center: CostCenterId) -> bool;

    /// Returns true if the operation center belongs to the cost center
    fn belongs_to(
        &self,
        operation_center: OperationCenterId,
        cost_center: CostCenterId,
    ) -> bool;
}

/// Catalog backed by an in-memory map, for tests and caching adapters
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    centers: HashMap<CostCenterId, HashSet<OperationCenterId>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cost center with its operation centers
    pub fn register(
        &mut self,
        cost_center: CostCenterId,
        operation_centers: impl IntoIterator<Item = OperationCenterId>,
    ) {
        self.centers
            .entry(cost_center)
            .or_default()
            .extend(operation_centers);
    }
}

impl CostCenterCatalog for InMemoryCatalog {
    fn cost_center_exists(&self, cost_center: CostCenterId) -> bool {
        self.centers.contains_key(&cost_center)
    }

    fn belongs_to(
        &self,
        operation_center: OperationCenterId,
        cost_center: CostCenterId,
    ) -> bool {
        self.centers
            .get(&cost_center)
            .is_some_and(|ops| ops.contains(&operation_center))
    }
}
