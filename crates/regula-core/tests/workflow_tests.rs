mod common;

use common::{create_test_workflow, register_property, seed_standard_catalog, today};
use regula_core::{
    display::{OverdueEntries, Properties},
    params::{
        CreateStepProgress, DeleteProperty, Id, ListOverdue, ListProperties, ReorderSteps,
        UpdateStepDefinition, UpdateStepProgress,
    },
    ErrorKind, ProgressStatus, RegularizationStatus, WorkflowError,
};

#[tokio::test]
async fn test_full_regularization_lifecycle() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua Padre Roque", "MM-100").await;
    assert_eq!(property.steps.len(), 4);

    for entry in &property.steps {
        workflow
            .update_step_progress(&UpdateStepProgress {
                id: entry.id,
                status: Some("completed".to_string()),
                start_date: Some("2024-01-10".to_string()),
                ..Default::default()
            })
            .await
            .expect("Failed to complete step");
    }

    let progress = workflow
        .compute_progress(&Id { id: property.id })
        .await
        .unwrap();
    assert_eq!(progress.summary.completed_steps, 4);
    assert_eq!(progress.summary.completion_percentage, 100.0);
    assert!(progress.overdue.is_empty());
    assert!(progress
        .property
        .steps
        .iter()
        .all(|entry| entry.end_date == Some(today())));

    // the property status is maintained by hand
    assert_eq!(
        progress.property.regularization_status,
        RegularizationStatus::Pending
    );
}

#[tokio::test]
async fn test_reactivated_step_is_tracked_on_demand() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    let ids = seed_standard_catalog(&workflow).await;

    workflow
        .update_step_definition(&UpdateStepDefinition {
            id: ids[3],
            active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let property = register_property(&workflow, "Rua A", "MM-1").await;
    assert_eq!(property.steps.len(), 3);

    workflow
        .create_step_progress(
            &CreateStepProgress {
                property_id: property.id,
                step_id: ids[3],
            },
            None,
        )
        .await
        .unwrap();

    let reloaded = workflow
        .get_property(&Id { id: property.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.steps.len(), 4);
    assert_eq!(reloaded.steps[3].step_id, ids[3]);
}

#[tokio::test]
async fn test_reorder_changes_ledger_order() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    let ids = seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua A", "MM-1").await;

    workflow
        .reorder_steps(&ReorderSteps {
            ids: vec![ids[1], ids[0]],
        })
        .await
        .unwrap();

    let reloaded = workflow
        .get_property(&Id { id: property.id })
        .await
        .unwrap()
        .unwrap();
    let order: Vec<_> = reloaded.steps.iter().map(|entry| entry.step_id).collect();
    assert_eq!(order, vec![ids[1], ids[0], ids[2], ids[3]]);
}

#[tokio::test]
async fn test_reorder_rejects_empty_list() {
    let (_temp_dir, workflow) = create_test_workflow().await;

    let err = workflow
        .reorder_steps(&ReorderSteps { ids: vec![] })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_fleet_overdue_report() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let late = register_property(&workflow, "Rua A", "MM-1").await;
    let on_time = register_property(&workflow, "Rua B", "MM-2").await;

    // 15-day step started 20 days ago: 5 days late
    workflow
        .update_step_progress(&UpdateStepProgress {
            id: late.steps[0].id,
            status: Some("in_progress".to_string()),
            start_date: Some("2024-02-24".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    workflow
        .update_step_progress(&UpdateStepProgress {
            id: on_time.steps[0].id,
            status: Some("in_progress".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let overdue = workflow
        .list_overdue(&ListOverdue::default())
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].property_id, late.id);
    assert_eq!(overdue[0].municipal_code.as_deref(), Some("MM-1"));
    assert_eq!(overdue[0].days_overdue, 5);

    let output = OverdueEntries(overdue).to_string();
    assert!(output.contains("5 days overdue"));
}

#[tokio::test]
async fn test_completion_clears_overdue() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua A", "MM-1").await;
    let id = property.steps[0].id;

    workflow
        .update_step_progress(&UpdateStepProgress {
            id,
            status: Some("in_progress".to_string()),
            start_date: Some("2024-01-01".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        workflow
            .list_overdue(&ListOverdue::default())
            .await
            .unwrap()
            .len(),
        1
    );

    let entry = workflow
        .update_step_progress(&UpdateStepProgress {
            id,
            status: Some("completed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entry.status, ProgressStatus::Completed);
    assert!(workflow
        .list_overdue(&ListOverdue::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_clearing_responsible_user() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua A", "MM-1").await;
    let id = property.steps[0].id;

    let assigned = workflow
        .update_step_progress(&UpdateStepProgress {
            id,
            responsible_user_id: Some("12".to_string()),
            observations: Some("Waiting for the owner".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(assigned.responsible_user_id, Some(12));

    let cleared = workflow
        .update_step_progress(&UpdateStepProgress {
            id,
            responsible_user_id: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cleared.responsible_user_id, None);
    assert_eq!(cleared.observations.as_deref(), Some("Waiting for the owner"));
}

#[tokio::test]
async fn test_percentage_out_of_range() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua A", "MM-1").await;

    let err = workflow
        .update_step_progress(&UpdateStepProgress {
            id: property.steps[0].id,
            completion_percentage: Some(101),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        WorkflowError::InvalidInput { field, .. } => assert_eq!(field, "completion_percentage"),
        other => panic!("Expected InvalidInput error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_and_paginate_properties() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    for n in 1..=5 {
        register_property(&workflow, &format!("Rua {n}"), &format!("MM-{n}")).await;
    }

    let page = workflow
        .list_properties(&ListProperties {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    // newest first
    assert_eq!(page[0].municipal_code.as_deref(), Some("MM-3"));

    let found = workflow
        .list_properties(&ListProperties {
            search: Some("mm-4".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let err = workflow
        .list_properties(&ListProperties {
            status: Some("archived".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let rendered = Properties(found).to_string();
    assert!(rendered.contains("(MM-4)"));
}

#[tokio::test]
async fn test_deleted_property_is_gone() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    seed_standard_catalog(&workflow).await;
    let property = register_property(&workflow, "Rua A", "MM-1").await;

    workflow
        .delete_property(&DeleteProperty {
            id: property.id,
            confirmed: true,
        })
        .await
        .unwrap();

    assert!(workflow
        .get_property(&Id { id: property.id })
        .await
        .unwrap()
        .is_none());
    let err = workflow
        .delete_property(&DeleteProperty {
            id: property.id,
            confirmed: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::PropertyNotFound { .. }));

    // the code can be reused once the property is gone
    register_property(&workflow, "Rua A", "MM-1").await;
}
