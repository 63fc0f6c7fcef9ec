//! Tests for the workflow orchestrator against the in-memory store

use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, UserId};
use domain_distribution::DistributionDraft;
use domain_invoice::{DocumentKind, InvoiceStatus, Role};
use domain_workflow::adapters::InMemoryInvoiceStore;
use domain_workflow::{
    Actor, ChecklistGate, InvoiceStore, RequirementCode, StoreError, WorkflowError,
    WorkflowService,
};
use test_utils::{catalog_fixture, pipeline_fixture, InvoiceBuilder, StringFixtures};

fn service() -> WorkflowService<InMemoryInvoiceStore> {
    WorkflowService::new(InMemoryInvoiceStore::new(), pipeline_fixture().routing)
}

/// Registers a fresh invoice and walks it to the given status through real
/// operations
async fn drive_to(
    service: &WorkflowService<InMemoryInvoiceStore>,
    status: InvoiceStatus,
) -> core_kernel::InvoiceId {
    let pipeline = pipeline_fixture();
    let catalog = catalog_fixture();
    let invoice = InvoiceBuilder::new()
        .with_invoice_number(format!("FV-{}", UserId::new()))
        .build();
    let id = invoice.id;
    service.register(invoice).await.unwrap();

    if status == InvoiceStatus::Received {
        return id;
    }
    service
        .assign(id, pipeline.responsible, pipeline.responsible_area, UserId::new())
        .await
        .unwrap();
    if status == InvoiceStatus::Assigned {
        return id;
    }
    service.start(id, pipeline.responsible).await.unwrap();
    if status == InvoiceStatus::InProgress {
        return id;
    }

    // Complete the submission checklist through the public operations
    service
        .attach_document(
            id,
            pipeline.responsible,
            DocumentKind::PurchaseOrder,
            "oc.pdf",
            "application/pdf",
            "payables/oc.pdf",
        )
        .await
        .unwrap();
    service
        .attach_document(
            id,
            pipeline.responsible,
            DocumentKind::ManagementApproval,
            "approval.pdf",
            "application/pdf",
            "payables/approval.pdf",
        )
        .await
        .unwrap();
    service
        .save_distribution(
            id,
            pipeline.responsible,
            &[
                DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_north, dec!(60)),
                DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_south, dec!(40)),
            ],
            &catalog.catalog,
        )
        .await
        .unwrap();
    service
        .classify(id, pipeline.responsible, catalog.maintenance_cc, catalog.maintenance_north)
        .await
        .unwrap();

    service.submit(id, pipeline.responsible).await.unwrap();
    if status == InvoiceStatus::AccountingReview {
        return id;
    }
    service.approve(id, pipeline.accountant).await.unwrap();
    if status == InvoiceStatus::TreasuryApproved {
        return id;
    }

    service
        .attach_document(
            id,
            pipeline.treasurer,
            DocumentKind::Pec,
            "pec.pdf",
            "application/pdf",
            "payables/pec.pdf",
        )
        .await
        .unwrap();
    service.finalize(id, pipeline.treasurer).await.unwrap();
    id
}

// Read-side access to the store behind the service
async fn service_store_load(
    service: &WorkflowService<InMemoryInvoiceStore>,
    id: core_kernel::InvoiceId,
) -> (domain_workflow::InvoiceDossier, domain_workflow::Version) {
    service.store().load(id).await.unwrap()
}

mod pipeline {
    use super::*;

    #[tokio::test]
    async fn test_happy_path_received_to_closed() {
        let service = service();
        let id = drive_to(&service, InvoiceStatus::Closed).await;

        let (dossier, _) = service_store_load(&service, id).await;
        assert_eq!(dossier.invoice.status, InvoiceStatus::Closed);
        assert!(dossier.attachments.has(DocumentKind::Pec));
        assert!(dossier.distribution.is_complete());
    }

    #[tokio::test]
    async fn test_submit_rejected_while_checklist_open() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let error = service.submit(id, pipeline.responsible).await.unwrap_err();
        match error {
            WorkflowError::Validation(unmet) => {
                let codes: Vec<RequirementCode> = unmet.iter().map(|u| u.code).collect();
                assert!(codes.contains(&RequirementCode::PurchaseOrderAttached));
                assert!(codes.contains(&RequirementCode::ManagementApprovalAttached));
                assert!(codes.contains(&RequirementCode::DistributionComplete));
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        // Nothing was applied
        let (dossier, _) = service_store_load(&service, id).await;
        assert_eq!(dossier.invoice.status, InvoiceStatus::InProgress);
    }

    #[tokio::test]
    async fn test_return_loop_and_resubmission() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::AccountingReview).await;

        let dossier = service
            .return_to_responsible(id, pipeline.accountant, "needs more detail")
            .await
            .unwrap();
        assert_eq!(dossier.invoice.status, InvoiceStatus::InProgress);
        assert_eq!(dossier.invoice.return_reason.as_deref(), Some("needs more detail"));

        // Resubmission clears the stored reason
        let dossier = service.submit(id, pipeline.responsible).await.unwrap();
        assert_eq!(dossier.invoice.status, InvoiceStatus::AccountingReview);
        assert_eq!(dossier.invoice.return_reason, None);
    }

    #[tokio::test]
    async fn test_short_return_reason_is_rejected() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::AccountingReview).await;

        let error = service
            .return_to_responsible(id, pipeline.accountant, StringFixtures::short_return_reason())
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn test_wrong_role_is_illegal() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::AccountingReview).await;

        let error = service.approve(id, pipeline.treasurer).await.unwrap_err();
        assert!(matches!(error, WorkflowError::IllegalTransition { .. }));
    }

    #[tokio::test]
    async fn test_finalize_requires_treasury_document() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::TreasuryApproved).await;

        let error = service.finalize(id, pipeline.treasurer).await.unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));

        service
            .attach_document(
                id,
                pipeline.treasurer,
                DocumentKind::Pec,
                "pec.pdf",
                "application/pdf",
                "payables/pec.pdf",
            )
            .await
            .unwrap();
        let dossier = service.finalize(id, pipeline.treasurer).await.unwrap();
        assert_eq!(dossier.invoice.status, InvoiceStatus::Closed);
    }
}

mod distribution_ops {
    use super::*;

    #[tokio::test]
    async fn test_save_distribution_replaces_lines() {
        let service = service();
        let pipeline = pipeline_fixture();
        let catalog = catalog_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let dossier = service
            .save_distribution(
                id,
                pipeline.responsible,
                &[DistributionDraft::new(
                    catalog.operations_cc,
                    catalog.operations_central,
                    dec!(100),
                )],
                &catalog.catalog,
            )
            .await
            .unwrap();
        assert_eq!(dossier.distribution.lines().len(), 1);

        let dossier = service
            .save_distribution(
                id,
                pipeline.responsible,
                &[
                    DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_north, dec!(60)),
                    DistributionDraft::new(catalog.maintenance_cc, catalog.maintenance_south, dec!(40)),
                ],
                &catalog.catalog,
            )
            .await
            .unwrap();
        assert_eq!(dossier.distribution.lines().len(), 2);
        assert_eq!(dossier.distribution.total_percentage(), dec!(100));
    }

    #[tokio::test]
    async fn test_invalid_distribution_keeps_old_lines() {
        let service = service();
        let pipeline = pipeline_fixture();
        let catalog = catalog_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        service
            .save_distribution(
                id,
                pipeline.responsible,
                &[DistributionDraft::new(
                    catalog.maintenance_cc,
                    catalog.maintenance_north,
                    dec!(100),
                )],
                &catalog.catalog,
            )
            .await
            .unwrap();

        let error = service
            .save_distribution(
                id,
                pipeline.responsible,
                &[DistributionDraft::new(
                    catalog.maintenance_cc,
                    catalog.maintenance_north,
                    dec!(99.5),
                )],
                &catalog.catalog,
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Distribution(_)));

        // Old lines survived the rejected replacement
        let (dossier, _) = service_store_load(&service, id).await;
        assert_eq!(dossier.distribution.lines().len(), 1);
        assert_eq!(dossier.distribution.total_percentage(), dec!(100));
    }

    #[tokio::test]
    async fn test_distribution_is_frozen_downstream() {
        let service = service();
        let pipeline = pipeline_fixture();
        let catalog = catalog_fixture();
        let id = drive_to(&service, InvoiceStatus::AccountingReview).await;

        let error = service
            .save_distribution(
                id,
                pipeline.accountant,
                &[DistributionDraft::new(
                    catalog.maintenance_cc,
                    catalog.maintenance_north,
                    dec!(100),
                )],
                &catalog.catalog,
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::IllegalTransition { .. }));
    }
}

mod flag_and_preview {
    use super::*;

    #[tokio::test]
    async fn test_toggle_administrative_expense_changes_preview() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let report = service
            .preview_checklist(id, ChecklistGate::SubmitToAccounting)
            .await
            .unwrap();
        let codes = report.unmet_codes();
        assert!(codes.contains(&RequirementCode::PurchaseOrderAttached));

        service
            .toggle_administrative_expense(id, pipeline.responsible, true)
            .await
            .unwrap();

        let report = service
            .preview_checklist(id, ChecklistGate::SubmitToAccounting)
            .await
            .unwrap();
        let codes = report.unmet_codes();
        assert!(!codes.contains(&RequirementCode::PurchaseOrderAttached));
        assert!(!codes.contains(&RequirementCode::ManagementApprovalAttached));
        // The distribution requirement does not bend
        assert!(codes.contains(&RequirementCode::DistributionComplete));
    }

    #[tokio::test]
    async fn test_preview_does_not_mutate() {
        let service = service();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let (before, version_before) = service_store_load(&service, id).await;
        service
            .preview_checklist(id, ChecklistGate::SubmitToAccounting)
            .await
            .unwrap();
        let (after, version_after) = service_store_load(&service, id).await;

        assert_eq!(version_before, version_after);
        assert_eq!(
            serde_json::to_value(&before).unwrap(),
            serde_json::to_value(&after).unwrap()
        );
    }
}

mod documents_and_comments {
    use super::*;

    #[tokio::test]
    async fn test_attach_enforces_content_type_policy() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let error = service
            .attach_document(
                id,
                pipeline.responsible,
                DocumentKind::PurchaseOrder,
                "oc.png",
                "image/png",
                "payables/oc.png",
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::UnsupportedContentType { .. }));

        // Approval accepts images
        let dossier = service
            .attach_document(
                id,
                pipeline.responsible,
                DocumentKind::ManagementApproval,
                "approval.png",
                "image/png",
                "payables/approval.png",
            )
            .await
            .unwrap();
        assert!(dossier.attachments.has(DocumentKind::ManagementApproval));
    }

    #[tokio::test]
    async fn test_remove_document() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let dossier = service
            .attach_document(
                id,
                pipeline.responsible,
                DocumentKind::InvoicePdf,
                "factura.pdf",
                "application/pdf",
                "payables/factura.pdf",
            )
            .await
            .unwrap();
        let attachment_id = dossier
            .attachments
            .current(DocumentKind::InvoicePdf)
            .unwrap()
            .id;

        let dossier = service.remove_document(id, attachment_id).await.unwrap();
        assert!(!dossier.attachments.has(DocumentKind::InvoicePdf));

        let error = service.remove_document(id, attachment_id).await.unwrap_err();
        assert!(matches!(error, WorkflowError::Invoice(_)));
    }

    #[tokio::test]
    async fn test_comment_author_rules() {
        let service = service();
        let pipeline = pipeline_fixture();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        let dossier = service
            .add_comment(id, pipeline.responsible, "awaiting credit note")
            .await
            .unwrap();
        let comment_id = dossier.comments[0].id;

        // The accountant may not edit someone else's comment
        let intruder = Actor::new(pipeline.accountant.user_id, Role::Accounting);
        let error = service
            .edit_comment(id, intruder, comment_id, "edited")
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Invoice(_)));

        // The author may
        service
            .edit_comment(id, pipeline.responsible, comment_id, "credit note received")
            .await
            .unwrap();
        let error = service
            .delete_comment(id, intruder, comment_id)
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Invoice(_)));
        service
            .delete_comment(id, pipeline.responsible, comment_id)
            .await
            .unwrap();
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn test_stale_commit_surfaces_as_conflict() {
        let service = service();
        let id = drive_to(&service, InvoiceStatus::InProgress).await;

        // Two readers load the same version; the slower commit loses
        let (dossier_a, version) = service_store_load(&service, id).await;
        let (dossier_b, _) = service_store_load(&service, id).await;

        service.store().commit(version, dossier_a).await.unwrap();
        let error = service.store().commit(version, dossier_b).await.unwrap_err();
        assert!(matches!(error, StoreError::Conflict { .. }));

        let workflow_error = WorkflowError::from(error);
        assert!(matches!(workflow_error, WorkflowError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_registering_a_positive_total_invoice() {
        let service = service();
        let invoice = InvoiceBuilder::new()
            .with_total(Money::new(dec!(990_000.00), Currency::COP))
            .build();
        let dossier = service.register(invoice).await.unwrap();
        assert_eq!(dossier.invoice.status, InvoiceStatus::Received);
    }
}
