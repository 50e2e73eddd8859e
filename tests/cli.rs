//! End-to-end tests for the splitkro binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitkro(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitkro").unwrap();
    cmd.env("SPLITKRO_DATA_DIR", dir.path())
        .env_remove("SPLITKRO_LOG");
    cmd
}

/// Goa Trip with one 90.00 dinner paid by Asha and split three ways
fn goa_trip() -> TempDir {
    let dir = TempDir::new().unwrap();
    splitkro(&dir).arg("init").assert().success();
    splitkro(&dir)
        .args(["group", "create", "Goa Trip", "--members", "Asha,Ravi,Meera"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created group: Goa Trip"));
    splitkro(&dir)
        .args(["expense", "add", "Goa Trip", "Dinner", "90", "--paid-by", "Asha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dinner $90.00 paid by Asha"));
    dir
}

#[test]
fn test_init_and_config() {
    let dir = TempDir::new().unwrap();

    splitkro(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("groups.json").exists());

    splitkro(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized:      true"))
        .stdout(predicate::str::contains("Currency symbol:   $"));
}

#[test]
fn test_balance_suggests_payments() {
    let dir = goa_trip();

    splitkro(&dir)
        .args(["balance", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total spent: $90.00"))
        .stdout(predicate::str::contains("gets back"))
        .stdout(predicate::str::contains("pays Asha"))
        .stdout(predicate::str::contains("2 payment(s), $60.00 in total"));
}

#[test]
fn test_settle_auto_follows_plan() {
    let dir = goa_trip();

    splitkro(&dir)
        .args(["settle", "Goa Trip", "--auto", "Ravi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded: Ravi paid Asha $30.00"));

    splitkro(&dir)
        .args(["settle", "Goa Trip", "--auto", "Ravi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ravi is already settled up."));

    splitkro(&dir)
        .args(["balance", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 payment(s), $30.00 in total"));

    splitkro(&dir)
        .args(["settle-history", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("suggested"));
}

#[test]
fn test_partial_settlement() {
    let dir = goa_trip();

    splitkro(&dir)
        .args([
            "settle", "Goa Trip", "--from", "Meera", "--to", "Asha", "--amount", "10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded: Meera paid Asha $10.00"))
        .stdout(predicate::str::contains("Partial payment: $30.00 was suggested"));

    splitkro(&dir)
        .args(["settle-history", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("partial of $30.00"));

    splitkro(&dir)
        .args(["balance", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 payment(s), $50.00 in total"));
}

#[test]
fn test_settle_requires_members() {
    let dir = goa_trip();

    splitkro(&dir)
        .args(["settle", "Goa Trip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from and --to"));
}

#[test]
fn test_unknown_group_fails() {
    let dir = TempDir::new().unwrap();

    splitkro(&dir)
        .args(["balance", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Group not found: Nowhere"));
}

#[test]
fn test_exact_split_must_add_up() {
    let dir = goa_trip();

    splitkro(&dir)
        .args([
            "expense", "add", "Goa Trip", "Hotel", "100", "--paid-by", "Ravi", "--share",
            "Asha=50", "--share", "Ravi=40",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("add up to"));

    splitkro(&dir)
        .args([
            "expense", "add", "Goa Trip", "Hotel", "100", "--paid-by", "Ravi", "--share",
            "Asha=60", "--share", "Ravi=40",
        ])
        .assert()
        .success();

    splitkro(&dir)
        .args(["expense", "list", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hotel"))
        .stdout(predicate::str::contains("Dinner"));
}

#[test]
fn test_simplify_file_as_json() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("balances.json");
    fs::write(
        &file,
        r#"[
            {"memberId": "A", "displayName": "Asha", "netBalance": -10},
            {"memberId": "B", "displayName": "Ravi", "netBalance": 5},
            {"memberId": "C", "displayName": "Meera", "netBalance": 5}
        ]"#,
    )
    .unwrap();

    let output = splitkro(&dir)
        .arg("simplify")
        .arg(&file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let plan = plan.as_array().unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0]["fromMemberId"], "A");
    assert_eq!(plan[0]["toMemberId"], "B");
    assert_eq!(plan[0]["amount"].as_f64(), Some(5.0));
    assert_eq!(plan[1]["toMemberId"], "C");
}

#[test]
fn test_simplify_reports_inconsistent_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("balances.json");
    fs::write(
        &file,
        r#"[
            {"memberId": "A", "displayName": "Asha", "netBalance": -30},
            {"memberId": "B", "displayName": "Ravi", "netBalance": 50}
        ]"#,
    )
    .unwrap();

    splitkro(&dir)
        .arg("simplify")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("pays Ravi"))
        .stdout(predicate::str::contains("balances do not sum to zero"))
        .stdout(predicate::str::contains("Ravi: $20.00"));
}

#[test]
fn test_export_plan_csv_and_json() {
    let dir = goa_trip();
    let csv_path = dir.path().join("plan.csv");
    let json_path = dir.path().join("trip.json");

    splitkro(&dir)
        .args(["export", "Goa Trip"])
        .arg(&csv_path)
        .args(["--format", "csv", "--plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settlement plan exported to"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Step,From,From ID,To,To ID,Amount"));
    assert_eq!(lines.count(), 2);

    splitkro(&dir)
        .args(["export", "Goa Trip"])
        .arg(&json_path)
        .assert()
        .success();

    let export: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(export["group"]["name"], "Goa Trip");
    assert_eq!(export["plan"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_group_delete_needs_force() {
    let dir = goa_trip();

    splitkro(&dir)
        .args(["group", "delete", "Goa Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    splitkro(&dir)
        .args(["group", "delete", "Goa Trip", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 expense(s)"));

    splitkro(&dir)
        .args(["group", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goa Trip").not());
}

#[test]
fn test_audit_lists_changes() {
    let dir = goa_trip();

    splitkro(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Group"))
        .stdout(predicate::str::contains("CREATE Expense"));
}

#[test]
fn test_simplify_settles_fractional_cents() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("balances.json");
    fs::write(
        &file,
        r#"[
            {"memberId": "a", "displayName": "Asha", "netBalance": 10.005},
            {"memberId": "b", "displayName": "Ravi", "netBalance": 10.005},
            {"memberId": "c", "displayName": "Meera", "netBalance": 10.005},
            {"memberId": "d", "displayName": "Kabir", "netBalance": 10.005},
            {"memberId": "e", "displayName": "Isha", "netBalance": -40.02}
        ]"#,
    )
    .unwrap();

    let output = splitkro(&dir)
        .arg("simplify")
        .arg(&file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("sum to zero"));

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let plan = plan.as_array().unwrap();
    assert_eq!(plan.len(), 4);
    assert!(plan.iter().all(|t| t["fromMemberId"] == "e"));

    let total: f64 = plan.iter().filter_map(|t| t["amount"].as_f64()).sum();
    assert!((total - 40.02).abs() < 1e-9);
}

#[test]
fn test_import_restores_exported_group() {
    let source = goa_trip();
    let json_path = source.path().join("trip.json");
    let yaml_path = source.path().join("trip.yaml");

    splitkro(&source)
        .args(["export", "Goa Trip"])
        .arg(&json_path)
        .assert()
        .success();
    splitkro(&source)
        .args(["export", "Goa Trip"])
        .arg(&yaml_path)
        .args(["--format", "yaml"])
        .assert()
        .success();

    splitkro(&source)
        .arg("import")
        .arg(&json_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    for path in [&json_path, &yaml_path] {
        let target = TempDir::new().unwrap();
        splitkro(&target).arg("init").assert().success();

        splitkro(&target)
            .arg("import")
            .arg(path)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Imported group: Goa Trip (1 expense(s), 0 settlement(s))",
            ));

        splitkro(&target)
            .args(["balance", "Goa Trip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 payment(s), $60.00 in total"));
    }
}

#[test]
fn test_import_rejects_csv() {
    let dir = goa_trip();
    let csv_path = dir.path().join("ledger.csv");

    splitkro(&dir)
        .args(["export", "Goa Trip"])
        .arg(&csv_path)
        .args(["--format", "csv"])
        .assert()
        .success();

    splitkro(&dir)
        .arg("import")
        .arg(&csv_path)
        .args(["--format", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be imported"));
}
