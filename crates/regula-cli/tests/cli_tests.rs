use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn regula_cmd() -> Command {
    let mut cmd = Command::cargo_bin("regula").expect("Failed to find regula binary");
    cmd.arg("--no-color");
    cmd
}

/// Adds two catalog steps so new properties get a ledger.
fn seed_catalog(db_arg: &str) {
    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "catalog",
            "add",
            "Document collection",
            "--order",
            "1",
            "--duration",
            "15",
        ])
        .assert()
        .success();
    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "catalog",
            "add",
            "Topographic survey",
            "--order",
            "2",
        ])
        .assert()
        .success();
}

#[test]
fn test_cli_catalog_add_and_list() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);

    regula_cmd()
        .args(["--database-file", db_arg, "catalog", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 1. Document collection (ID: 1)"))
        .stdout(predicate::str::contains("## 2. Topographic survey (ID: 2)"))
        .stdout(predicate::str::contains("Estimated duration**: 15 days"));
}

#[test]
fn test_cli_catalog_order_conflict() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);

    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "catalog",
            "add",
            "Duplicate",
            "--order",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("order_sequence"));
}

#[test]
fn test_cli_list_empty_properties() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    regula_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "property",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No properties found."));
}

#[test]
fn test_cli_default_command_lists_properties() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    regula_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No properties found."));
}

#[test]
fn test_cli_create_property_bootstraps_ledger() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);

    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "property",
            "create",
            "Rua Padre Roque",
            "--number",
            "120",
            "--municipal-code",
            "MM-001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created property with ID: 1"));

    regula_cmd()
        .args(["--database-file", db_arg, "property", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 1."))
        .stdout(predicate::str::contains("(MM-001)"))
        .stdout(predicate::str::contains("### 1. Document collection"))
        .stdout(predicate::str::contains("### 2. Topographic survey"));
}

#[test]
fn test_cli_complete_step() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);
    regula_cmd()
        .args(["--database-file", db_arg, "property", "create", "Rua A"])
        .assert()
        .success();

    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "ledger",
            "update",
            "1",
            "--status",
            "completed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"));

    regula_cmd()
        .args(["--database-file", db_arg, "report", "progress", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Progress: 1/2 steps completed (50.00%)",
        ));
}

#[test]
fn test_cli_invalid_status_rejected_by_parser() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    regula_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ledger",
            "update",
            "1",
            "--status",
            "finished",
        ])
        .assert()
        .failure();
}

#[test]
fn test_cli_viewer_cannot_create_property() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    regula_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "--role",
            "viewer",
            "property",
            "create",
            "Rua B",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Access denied: role 'viewer' cannot create properties",
        ));
}

#[test]
fn test_cli_operator_cannot_view_statistics() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    regula_cmd()
        .args(["--database-file", db_arg, "--role", "operator", "report", "statistics"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));

    regula_cmd()
        .args(["--database-file", db_arg, "--role", "manager", "report", "statistics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Statistics"));
}

#[test]
fn test_cli_json_output() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);

    let output = regula_cmd()
        .args(["--database-file", db_arg, "--json", "catalog", "list"])
        .output()
        .expect("Failed to run regula");
    assert!(output.status.success());

    let definitions: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    let definitions = definitions.as_array().expect("Expected an array");
    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0]["name"], "Document collection");
    assert_eq!(definitions[0]["order_sequence"], 1);
}

#[test]
fn test_cli_delete_property_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    regula_cmd()
        .args(["--database-file", db_arg, "property", "create", "Rua C"])
        .assert()
        .success();

    regula_cmd()
        .args(["--database-file", db_arg, "property", "delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirm"));

    regula_cmd()
        .args(["--database-file", db_arg, "property", "delete", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted property"));

    regula_cmd()
        .args(["--database-file", db_arg, "property", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No properties found."));
}

#[test]
fn test_cli_catalog_reorder() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);

    regula_cmd()
        .args(["--database-file", db_arg, "catalog", "reorder", "2,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step definitions reordered"))
        .stdout(predicate::str::contains("## 1. Topographic survey (ID: 2)"));
}

#[test]
fn test_cli_catalog_import() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let catalog_path = temp_dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"[{"name": "Survey", "order_sequence": 1, "estimated_duration_days": 30},
            {"name": "Approval", "order_sequence": 2}]"#,
    )
    .unwrap();

    regula_cmd()
        .args([
            "--database-file",
            db_arg,
            "catalog",
            "import",
            catalog_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 step definition(s)"));
}

#[test]
fn test_cli_report_overview() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_catalog(db_arg);
    regula_cmd()
        .args(["--database-file", db_arg, "property", "create", "Rua D"])
        .assert()
        .success();

    regula_cmd()
        .args(["--database-file", db_arg, "report", "overview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Overview"))
        .stdout(predicate::str::contains("- **Properties**: 1"));
}

#[test]
fn test_cli_ledger_statuses() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    regula_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "ledger",
            "statuses",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("not_started"))
        .stdout(predicate::str::contains("blocked"));
}
