//! Custom test assertions
//!
//! Specialized assertion helpers for domain types that give more meaningful
//! error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_invoice::InvoiceStatus;
use domain_workflow::{ChecklistReport, RequirementCode, WorkflowError};

/// Asserts that two Money values are approximately equal within a tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a checklist report failed a specific rule
pub fn assert_unmet(report: &ChecklistReport, code: RequirementCode) {
    assert!(
        report.unmet.iter().any(|u| u.code == code),
        "Expected unmet requirement {code:?}, got {:?}",
        report.unmet_codes()
    );
}

/// Asserts that a checklist report did NOT fail a specific rule
pub fn assert_met(report: &ChecklistReport, code: RequirementCode) {
    assert!(
        report.unmet.iter().all(|u| u.code != code),
        "Expected requirement {code:?} to be met, got {:?}",
        report.unmet_codes()
    );
}

/// Asserts that a workflow error is a validation rejection containing the
/// given rule
pub fn assert_validation_failure(error: &WorkflowError, code: RequirementCode) {
    match error {
        WorkflowError::Validation(unmet) => assert!(
            unmet.iter().any(|u| u.code == code),
            "Expected {code:?} among {:?}",
            unmet.iter().map(|u| u.code).collect::<Vec<_>>()
        ),
        other => panic!("Expected WorkflowError::Validation, got {other:?}"),
    }
}

/// Asserts that a workflow error is an illegal-transition rejection
pub fn assert_illegal_transition(error: &WorkflowError, status: InvoiceStatus) {
    match error {
        WorkflowError::IllegalTransition { status: s, .. } => assert_eq!(
            *s, status,
            "IllegalTransition reported wrong status: {s:?} != {status:?}"
        ),
        other => panic!("Expected WorkflowError::IllegalTransition, got {other:?}"),
    }
}
