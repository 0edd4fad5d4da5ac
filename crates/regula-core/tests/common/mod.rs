use std::sync::Arc;

use jiff::civil::{date, Date};
use regula_core::{
    params::{CreateProperty, CreateStepDefinition},
    FixedClock, Property, Workflow, WorkflowBuilder,
};
use tempfile::TempDir;

/// The date every test workflow treats as today.
pub fn today() -> Date {
    date(2024, 3, 15)
}

/// Helper function to create a test workflow with a pinned clock
pub async fn create_test_workflow() -> (TempDir, Workflow) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let workflow = WorkflowBuilder::new()
        .with_database_path(Some(&db_path))
        .with_clock(Arc::new(FixedClock::new(today())))
        .build()
        .await
        .expect("Failed to create workflow");
    (temp_dir, workflow)
}

/// Creates the standard four-step catalog and returns the definition IDs.
pub async fn seed_standard_catalog(workflow: &Workflow) -> Vec<u64> {
    let steps = [
        ("Document collection", Some(15)),
        ("Topographic survey", Some(30)),
        ("Municipal approval", Some(60)),
        ("Registry filing", None),
    ];

    let mut ids = Vec::new();
    for (order, (name, duration)) in (1..).zip(steps) {
        let definition = workflow
            .create_step_definition(&CreateStepDefinition {
                name: name.to_string(),
                order_sequence: order,
                estimated_duration_days: duration,
                ..Default::default()
            })
            .await
            .expect("Failed to create step definition");
        ids.push(definition.id);
    }
    ids
}

pub async fn register_property(workflow: &Workflow, street: &str, code: &str) -> Property {
    workflow
        .create_property(
            &CreateProperty {
                address_street: street.to_string(),
                municipal_code: Some(code.to_string()),
                ..Default::default()
            },
            Some(1),
        )
        .await
        .expect("Failed to create property")
}
