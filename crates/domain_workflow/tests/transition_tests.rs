//! Tests for the transition engine

use core_kernel::UserId;
use domain_invoice::{DocumentKind, InvoiceStatus, Role};
use domain_workflow::{
    decide, is_legal, ActionKind, InvoiceAction, RequirementCode, WorkflowError,
};
use test_utils::{
    assert_illegal_transition, assert_validation_failure, pipeline_fixture, ready_dossier,
    DossierBuilder, InvoiceBuilder, StringFixtures,
};

/// Builds a payload for an action kind, with valid ids and reasons
fn action_for(kind: ActionKind) -> InvoiceAction {
    let pipeline = pipeline_fixture();
    match kind {
        ActionKind::Assign => InvoiceAction::Assign {
            area_id: pipeline.responsible_area,
            user_id: UserId::new(),
        },
        ActionKind::Start => InvoiceAction::Start,
        ActionKind::SubmitToAccounting => InvoiceAction::SubmitToAccounting,
        ActionKind::Approve => InvoiceAction::Approve,
        ActionKind::ReturnToResponsible => InvoiceAction::ReturnToResponsible {
            reason: StringFixtures::valid_return_reason().to_string(),
        },
        ActionKind::ReturnToInvoicing => InvoiceAction::ReturnToInvoicing {
            reason: StringFixtures::valid_return_reason().to_string(),
        },
        ActionKind::Reject => InvoiceAction::Reject {
            reason: StringFixtures::valid_return_reason().to_string(),
        },
        ActionKind::Finalize => InvoiceAction::Finalize,
    }
}

fn actor_for(role: Role) -> domain_workflow::Actor {
    let pipeline = pipeline_fixture();
    match role {
        Role::ResponsibleArea => pipeline.responsible,
        Role::Accounting => pipeline.accountant,
        Role::Treasury => pipeline.treasurer,
    }
}

/// The tabulated target state for every legal triple
fn expected_target(
    status: InvoiceStatus,
    role: Role,
    kind: ActionKind,
) -> Option<InvoiceStatus> {
    use ActionKind::*;
    use InvoiceStatus::*;
    use Role::*;

    match (status, role, kind) {
        (Received, ResponsibleArea, Assign) => Some(Assigned),
        (Assigned, ResponsibleArea, Start) => Some(InProgress),
        (InProgress, ResponsibleArea, SubmitToAccounting) => Some(AccountingReview),
        (AccountingReview, Accounting, Approve) => Some(TreasuryApproved),
        (AccountingReview, Accounting, ReturnToResponsible) => Some(InProgress),
        (AccountingReview, Accounting, Reject) => Some(Rejected),
        (TreasuryApproved, Treasury, Reject) => Some(Rejected),
        (TreasuryApproved, Treasury, Finalize) => Some(Closed),
        (Assigned, ResponsibleArea, ReturnToInvoicing) => Some(Received),
        (InProgress, ResponsibleArea, ReturnToInvoicing) => Some(Received),
        _ => None,
    }
}

mod exhaustiveness {
    use super::*;

    #[test]
    fn test_every_triple_matches_the_table() {
        let pipeline = pipeline_fixture();

        for status in InvoiceStatus::all() {
            for role in Role::all() {
                for kind in ActionKind::all() {
                    // A dossier that satisfies every gate, so only the
                    // table decides the outcome.
                    let mut dossier = DossierBuilder::new()
                        .with_invoice(InvoiceBuilder::new().in_status(status).build())
                        .submission_ready()
                        .with_document(DocumentKind::Pec)
                        .build();
                    // Returns must route somewhere sensible
                    dossier.invoice.area_id = pipeline.responsible_area;

                    let result = decide(
                        &dossier,
                        &actor_for(role),
                        &action_for(kind),
                        &pipeline.routing,
                    );

                    match expected_target(status, role, kind) {
                        Some(target) => {
                            assert!(is_legal(status, role, kind));
                            let updated = result.unwrap_or_else(|e| {
                                panic!("({status:?}, {role:?}, {kind:?}) should succeed: {e}")
                            });
                            assert_eq!(updated.status, target);
                        }
                        None => {
                            assert!(!is_legal(status, role, kind));
                            match result {
                                Err(WorkflowError::IllegalTransition { .. }) => {}
                                other => panic!(
                                    "({status:?}, {role:?}, {kind:?}) should be illegal, got {other:?}"
                                ),
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_reapplying_a_committed_transition_is_rejected() {
        let pipeline = pipeline_fixture();
        let mut dossier = ready_dossier(InvoiceStatus::InProgress);

        let updated = decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::SubmitToAccounting,
            &pipeline.routing,
        )
        .unwrap();
        dossier.invoice = updated;

        // Same action against the new snapshot: the from-state guard fails
        let retry = decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::SubmitToAccounting,
            &pipeline.routing,
        );
        assert_illegal_transition(&retry.unwrap_err(), InvoiceStatus::AccountingReview);
    }

    #[test]
    fn test_decide_never_mutates_its_input() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::InProgress);
        let before = serde_json::to_value(&dossier).unwrap();

        decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::SubmitToAccounting,
            &pipeline.routing,
        )
        .unwrap();

        assert_eq!(serde_json::to_value(&dossier).unwrap(), before);
    }
}

mod side_effects {
    use super::*;

    #[test]
    fn test_submit_routes_to_accounting_and_clears_return_reason() {
        let pipeline = pipeline_fixture();
        let mut dossier = ready_dossier(InvoiceStatus::InProgress);
        dossier.invoice.return_reason = Some("fix the support".to_string());

        let updated = decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::SubmitToAccounting,
            &pipeline.routing,
        )
        .unwrap();

        assert_eq!(updated.status, InvoiceStatus::AccountingReview);
        assert_eq!(updated.area_id, pipeline.routing.accounting.area_id);
        assert_eq!(
            updated.assigned_user_id,
            Some(pipeline.routing.accounting.user_id)
        );
        assert_eq!(updated.return_reason, None);
    }

    #[test]
    fn test_approve_routes_to_treasury() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::AccountingReview);

        let updated = decide(
            &dossier,
            &pipeline.accountant,
            &InvoiceAction::Approve,
            &pipeline.routing,
        )
        .unwrap();

        assert_eq!(updated.status, InvoiceStatus::TreasuryApproved);
        assert_eq!(updated.area_id, pipeline.routing.treasury.area_id);
        assert_eq!(
            updated.assigned_user_id,
            Some(pipeline.routing.treasury.user_id)
        );
    }

    #[test]
    fn test_return_goes_back_to_origin_area_with_reason() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::AccountingReview);
        let origin = dossier.invoice.origin_area_id;

        let updated = decide(
            &dossier,
            &pipeline.accountant,
            &InvoiceAction::ReturnToResponsible {
                reason: "needs more detail".to_string(),
            },
            &pipeline.routing,
        )
        .unwrap();

        assert_eq!(updated.status, InvoiceStatus::InProgress);
        assert_eq!(updated.area_id, origin);
        assert_eq!(updated.return_reason.as_deref(), Some("needs more detail"));
        assert_eq!(updated.assigned_user_id, None);
    }

    #[test]
    fn test_return_to_invoicing_resets_assignment() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::InProgress);

        let updated = decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::ReturnToInvoicing {
                reason: StringFixtures::valid_return_reason().to_string(),
            },
            &pipeline.routing,
        )
        .unwrap();

        assert_eq!(updated.status, InvoiceStatus::Received);
        assert_eq!(updated.area_id, updated.origin_area_id);
        assert_eq!(updated.assigned_user_id, None);
        assert_eq!(updated.assigned_at, None);
    }
}

mod reasons {
    use super::*;

    #[test]
    fn test_nine_character_reason_is_rejected() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::AccountingReview);

        let result = decide(
            &dossier,
            &pipeline.accountant,
            &InvoiceAction::ReturnToResponsible {
                reason: "ok".to_string(),
            },
            &pipeline.routing,
        );

        assert_validation_failure(&result.unwrap_err(), RequirementCode::ReturnReason);
    }

    #[test]
    fn test_padding_does_not_defeat_the_minimum() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::AccountingReview);

        let result = decide(
            &dossier,
            &pipeline.accountant,
            &InvoiceAction::ReturnToResponsible {
                reason: "   ok     ".to_string(),
            },
            &pipeline.routing,
        );

        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_reject_requires_a_reason_too() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::AccountingReview);

        let result = decide(
            &dossier,
            &pipeline.accountant,
            &InvoiceAction::Reject {
                reason: "bad".to_string(),
            },
            &pipeline.routing,
        );
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }
}

mod gates {
    use super::*;

    #[test]
    fn test_submit_without_checklist_reports_every_gap() {
        let pipeline = pipeline_fixture();
        // No documents, no classification, no distribution
        let dossier = DossierBuilder::new()
            .with_invoice(InvoiceBuilder::new().in_status(InvoiceStatus::InProgress).build())
            .build();

        let error = decide(
            &dossier,
            &pipeline.responsible,
            &InvoiceAction::SubmitToAccounting,
            &pipeline.routing,
        )
        .unwrap_err();

        let codes: Vec<RequirementCode> =
            error.unmet().iter().map(|u| u.code).collect();
        assert!(codes.contains(&RequirementCode::PurchaseOrderAttached));
        assert!(codes.contains(&RequirementCode::ManagementApprovalAttached));
        assert!(codes.contains(&RequirementCode::DistributionComplete));
    }

    #[test]
    fn test_finalize_needs_a_treasury_document() {
        let pipeline = pipeline_fixture();
        let dossier = ready_dossier(InvoiceStatus::TreasuryApproved);

        let result = decide(
            &dossier,
            &pipeline.treasurer,
            &InvoiceAction::Finalize,
            &pipeline.routing,
        );
        assert_validation_failure(
            &result.unwrap_err(),
            RequirementCode::TreasuryDocumentAttached,
        );

        let dossier = DossierBuilder::new()
            .with_invoice(InvoiceBuilder::new().in_status(InvoiceStatus::TreasuryApproved).build())
            .submission_ready()
            .with_document(DocumentKind::Pec)
            .build();

        let updated = decide(
            &dossier,
            &pipeline.treasurer,
            &InvoiceAction::Finalize,
            &pipeline.routing,
        )
        .unwrap();
        assert_eq!(updated.status, InvoiceStatus::Closed);
    }
}
