//! Pre-built test fixtures
//!
//! Ready-to-use test data for the pipeline: a two-cost-center catalog, a
//! routing directory, actors for every role, and common money amounts.
//! Fixtures are lazily built once so ids stay stable within a test
//! process.

use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use core_kernel::{AreaId, CostCenterId, Currency, Money, OperationCenterId, UserId};
use domain_distribution::InMemoryCatalog;
use domain_invoice::Role;
use domain_workflow::{Actor, Route, RoutingDirectory};

/// A small but realistic cost-center catalog
pub struct CatalogFixture {
    pub catalog: InMemoryCatalog,
    pub maintenance_cc: CostCenterId,
    pub maintenance_north: OperationCenterId,
    pub maintenance_south: OperationCenterId,
    pub operations_cc: CostCenterId,
    pub operations_central: OperationCenterId,
}

static CATALOG: Lazy<CatalogFixture> = Lazy::new(|| {
    let maintenance_cc = CostCenterId::new();
    let maintenance_north = OperationCenterId::new();
    let maintenance_south = OperationCenterId::new();
    let operations_cc = CostCenterId::new();
    let operations_central = OperationCenterId::new();

    let mut catalog = InMemoryCatalog::new();
    catalog.register(maintenance_cc, [maintenance_north, maintenance_south]);
    catalog.register(operations_cc, [operations_central]);

    CatalogFixture {
        catalog,
        maintenance_cc,
        maintenance_north,
        maintenance_south,
        operations_cc,
        operations_central,
    }
});

/// Shared catalog fixture with stable ids
pub fn catalog_fixture() -> &'static CatalogFixture {
    &CATALOG
}

/// The routing and actor cast of one pipeline instance
pub struct PipelineFixture {
    pub responsible_area: AreaId,
    pub routing: RoutingDirectory,
    pub responsible: Actor,
    pub accountant: Actor,
    pub treasurer: Actor,
}

static PIPELINE: Lazy<PipelineFixture> = Lazy::new(|| {
    let responsible_area = AreaId::new();
    let accounting_route = Route {
        area_id: AreaId::new(),
        user_id: UserId::new(),
    };
    let treasury_route = Route {
        area_id: AreaId::new(),
        user_id: UserId::new(),
    };

    PipelineFixture {
        responsible_area,
        routing: RoutingDirectory {
            accounting: accounting_route,
            treasury: treasury_route,
        },
        responsible: Actor::new(UserId::new(), Role::ResponsibleArea),
        accountant: Actor::new(accounting_route.user_id, Role::Accounting),
        treasurer: Actor::new(treasury_route.user_id, Role::Treasury),
    }
});

/// Shared routing/actor fixture with stable ids
pub fn pipeline_fixture() -> &'static PipelineFixture {
    &PIPELINE
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical domestic supplier invoice total
    pub fn cop_invoice_total() -> Money {
        Money::new(dec!(8_450_000.00), Currency::COP)
    }

    /// A small invoice total
    pub fn cop_small() -> Money {
        Money::new(dec!(150_000.00), Currency::COP)
    }

    /// A foreign-currency total
    pub fn usd_total() -> Money {
        Money::new(dec!(1_200.00), Currency::USD)
    }
}

/// Fixture for workflow strings
pub struct StringFixtures;

impl StringFixtures {
    /// A return reason comfortably above the 10-character minimum
    pub fn valid_return_reason() -> &'static str {
        "Missing the management approval for item 3"
    }

    /// A reason below the minimum length
    pub fn short_return_reason() -> &'static str {
        "ok"
    }

    pub fn supplier() -> &'static str {
        "Distribuciones El Norte SAS"
    }

    pub fn invoice_number() -> &'static str {
        "FV-2044"
    }
}
