use std::sync::Arc;

use jiff::civil::date;
use regula_core::{
    models::{
        DocumentFilter, NewDocument, NewProperty, NewStepDefinition, PropertyFilter,
        PropertyPatch, StepProgressPatch,
    },
    Database, ErrorKind, FixedClock, ProgressStatus, RegularizationStatus, WorkflowError,
};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let clock = Arc::new(FixedClock::new(date(2024, 3, 15)));
    let db = Database::with_clock(temp_file.path(), clock).expect("Failed to create test database");
    (temp_file, db)
}

fn new_definition(name: &str, order_sequence: i64, duration: Option<u32>) -> NewStepDefinition {
    NewStepDefinition {
        name: name.to_string(),
        description: None,
        order_sequence,
        estimated_duration_days: duration,
        required_documents: None,
        active: true,
    }
}

fn new_property(street: &str) -> NewProperty {
    NewProperty {
        address_street: street.to_string(),
        address_city: Some("Mogi Mirim".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_database_initialization() {
    let (temp_file, db) = create_test_db();

    assert!(temp_file.path().exists());
    assert!(db.list_step_definitions(false).unwrap().is_empty());
    assert_eq!(db.clock().today(), date(2024, 3, 15));
}

#[test]
fn test_reopening_keeps_data() {
    let (temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, Some(10)))
        .unwrap();
    drop(db);

    let db = Database::new(temp_file.path()).expect("Failed to reopen database");
    let definitions = db.list_step_definitions(false).unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].estimated_duration_days, Some(10));
}

#[test]
fn test_create_property_bootstraps_ledger() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Second", 20, None))
        .unwrap();
    db.create_step_definition(&new_definition("First", 10, None))
        .unwrap();

    let property = db.create_property(&new_property("Rua A"), None).unwrap();

    let names: Vec<_> = property.steps.iter().map(|s| s.step_name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert_eq!(property.regularization_status, RegularizationStatus::Pending);

    let loaded = db.get_property(property.id).unwrap().unwrap();
    assert_eq!(loaded.steps, property.steps);
}

#[test]
fn test_failed_bootstrap_rolls_back_property() {
    let (temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, None))
        .unwrap();

    // Make every ledger insert fail from a second connection
    let conn = rusqlite::Connection::open(temp_file.path()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_step_progress BEFORE INSERT ON step_progress
         BEGIN
             SELECT RAISE(ABORT, 'ledger insert rejected');
         END;",
    )
    .unwrap();
    drop(conn);

    let err = db.create_property(&new_property("Rua A"), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    let properties = db.list_properties(&PropertyFilter::default()).unwrap();
    assert!(properties.is_empty());
}

#[test]
fn test_duplicate_order_sequence_conflicts() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("A", 1, None))
        .unwrap();

    let err = db
        .create_step_definition(&new_definition("B", 1, None))
        .unwrap_err();

    match err {
        WorkflowError::Conflict { field, .. } => assert_eq!(field, "order_sequence"),
        other => panic!("Expected Conflict error, got {other:?}"),
    }
}

#[test]
fn test_update_missing_property() {
    let (_temp_file, mut db) = create_test_db();

    let err = db
        .update_property(
            42,
            &PropertyPatch {
                current_owner: Some(Some("Ana".to_string())),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, WorkflowError::PropertyNotFound { id: 42 }));
}

#[test]
fn test_update_property_clears_optional_field() {
    let (_temp_file, mut db) = create_test_db();
    let mut new = new_property("Rua A");
    new.current_owner = Some("Ana".to_string());
    let property = db.create_property(&new, None).unwrap();

    let updated = db
        .update_property(
            property.id,
            &PropertyPatch {
                current_owner: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.current_owner, None);
}

#[test]
fn test_list_properties_filters() {
    let (_temp_file, mut db) = create_test_db();
    let mut first = new_property("Rua das Flores");
    first.address_neighborhood = Some("Centro".to_string());
    first.current_owner = Some("Carlos Souza".to_string());
    db.create_property(&first, None).unwrap();

    let mut second = new_property("Avenida Brasil");
    second.address_neighborhood = Some("Jardim Europa".to_string());
    second.regularization_status = RegularizationStatus::InProgress;
    db.create_property(&second, None).unwrap();

    let by_owner = db
        .list_properties(&PropertyFilter {
            search: Some("souza".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_owner.len(), 1);
    assert_eq!(by_owner[0].address_street, "Rua das Flores");

    let by_status = db
        .list_properties(&PropertyFilter {
            status: Some(RegularizationStatus::InProgress),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].address_street, "Avenida Brasil");

    let all = db.list_properties(&PropertyFilter::default()).unwrap();
    assert_eq!(all.len(), 2);

    let neighborhoods = db.list_neighborhoods().unwrap();
    assert_eq!(neighborhoods, vec!["Centro", "Jardim Europa"]);
}

#[test]
fn test_update_step_progress_stamps_today() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, Some(10)))
        .unwrap();
    let property = db.create_property(&new_property("Rua A"), None).unwrap();
    let id = property.steps[0].id;

    let started = db
        .update_step_progress(
            id,
            &StepProgressPatch {
                status: Some(ProgressStatus::InProgress),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(started.start_date, Some(date(2024, 3, 15)));
    assert_eq!(started.end_date, None);

    let completed = db
        .update_step_progress(
            id,
            &StepProgressPatch {
                status: Some(ProgressStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(completed.end_date, Some(date(2024, 3, 15)));
    assert_eq!(completed.completion_percentage, 100);
}

#[test]
fn test_update_missing_step_progress() {
    let (_temp_file, mut db) = create_test_db();

    let err = db
        .update_step_progress(
            9,
            &StepProgressPatch {
                completion_percentage: Some(10),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_property_cascades_to_documents() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, None))
        .unwrap();
    let property = db.create_property(&new_property("Rua A"), None).unwrap();
    let entry_id = property.steps[0].id;

    db.attach_document(
        &NewDocument {
            step_progress_id: entry_id,
            filename: "plan.pdf".to_string(),
            file_path: "uploads/plan.pdf".to_string(),
            ..Default::default()
        },
        None,
    )
    .unwrap();

    db.delete_property(property.id).unwrap();

    assert!(db.get_step_progress(entry_id).unwrap().is_none());
    assert!(db
        .list_documents(&DocumentFilter::default())
        .unwrap()
        .is_empty());
    // the catalog is untouched
    assert_eq!(db.list_step_definitions(false).unwrap().len(), 1);
}

#[test]
fn test_fleet_overdue_sorted_by_lateness() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, Some(10)))
        .unwrap();
    let first = db.create_property(&new_property("Rua A"), None).unwrap();
    let second = db.create_property(&new_property("Rua B"), None).unwrap();

    for (entry, start) in [
        (&first.steps[0], date(2024, 3, 1)),
        (&second.steps[0], date(2024, 2, 1)),
    ] {
        db.update_step_progress(
            entry.id,
            &StepProgressPatch {
                status: Some(ProgressStatus::InProgress),
                start_date: Some(Some(start)),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let overdue = db.list_overdue(None).unwrap();
    assert_eq!(overdue.len(), 2);
    assert_eq!(overdue[0].property_id, second.id);
    assert_eq!(overdue[0].days_overdue, 33);
    assert_eq!(overdue[1].property_id, first.id);
    assert_eq!(overdue[1].days_overdue, 4);
}

#[test]
fn test_blocked_entries_are_never_overdue() {
    let (_temp_file, mut db) = create_test_db();
    db.create_step_definition(&new_definition("Survey", 1, Some(1)))
        .unwrap();
    let property = db.create_property(&new_property("Rua A"), None).unwrap();

    db.update_step_progress(
        property.steps[0].id,
        &StepProgressPatch {
            status: Some(ProgressStatus::Blocked),
            start_date: Some(Some(date(2023, 1, 1))),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(db.list_overdue(Some(property.id)).unwrap().is_empty());
}
