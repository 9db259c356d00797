//! Integration tests for the pawplan binary.
//!
//! These tests drive the full workflow through the command line:
//! - Creating program documents from the catalog
//! - Editing entries and packages
//! - Tally, quote and export output

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pawplan"))
}

/// Temp dir with an empty config so the user's own config never leaks in
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "").unwrap();
    (temp_dir, config)
}

fn new_program(config: &Path, out: &Path, packages: &[&str]) {
    let mut cmd = cli();
    cmd.arg("--config").arg(config).arg("new");
    for package in packages {
        cmd.arg("--package").arg(package);
    }
    cmd.arg("--out").arg(out).assert().success();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn first_entry(program: &Value) -> &Value {
    &program["packages"][0]["modules"][0]["entries"][0]
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dog training program composer and quote calculator",
        ));
}

#[test]
fn test_catalog_lists_packages() {
    let (_temp_dir, config) = setup_test_dir();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("puppy_start"))
        .stdout(predicate::str::contains("Basisgehoorzaamheid"))
        .stdout(predicate::str::contains("intake_conversation"));
}

#[test]
fn test_new_writes_program_document() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");

    new_program(&config, &program, &["puppy_start", "enrichment"]);

    let json = read_json(&program);
    let packages = json["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["title"], "Puppystart");
    assert_eq!(packages[1]["title"], "Verrijking");
    assert_eq!(packages[0]["include"], true);
}

#[test]
fn test_new_rejects_unknown_package() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");

    cli()
        .arg("--config")
        .arg(&config)
        .args(["new", "--package", "agility_pro", "--out"])
        .arg(&program)
        .assert()
        .failure()
        .stderr(predicate::str::contains("agility_pro"));

    assert!(!program.exists());
}

#[test]
fn test_missing_program_argument() {
    let (_temp_dir, config) = setup_test_dir();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("tally")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingArgument"));
}

#[test]
fn test_program_path_from_config() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);

    fs::write(
        &config,
        format!("[program]\ndefault_path = {:?}\n", program.to_str().unwrap()),
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verrijking"))
        .stdout(predicate::str::contains("Neuswerk"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_temp_dir, config) = setup_test_dir();
    fs::write(&config, "[tally]\nsession_duration_minutes = 0\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("session_duration_minutes"));
}

#[test]
fn test_tally_reports_sessions() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["basic_obedience"]);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args(["tally", "--band", "medium-high", "--duration", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Band: medium_high"))
        .stdout(predicate::str::contains("45 min/session"));
}

#[test]
fn test_excluded_package_drops_out_of_tally() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args(["edit", "toggle-package", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Excluded package 'Verrijking'"));

    assert_eq!(read_json(&program)["packages"][0]["include"], false);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .arg("tally")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 0–0"))
        .stdout(predicate::str::contains("Minutes: 0–0"));
}

#[test]
fn test_edit_entry_operations() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);

    let before = read_json(&program);
    let entry = first_entry(&before);
    let id = entry["id"].as_str().unwrap().to_string();
    assert_eq!(entry["placement"], "elementary");

    let edit = |args: &[&str]| {
        cli()
            .arg("--config")
            .arg(&config)
            .arg("--program")
            .arg(&program)
            .arg("edit")
            .args(args)
            .assert()
            .success();
    };

    edit(&["toggle-entry", &id]);
    let json = read_json(&program);
    assert_eq!(first_entry(&json)["include"], false);

    edit(&["exchange", &id, "retrieve"]);
    let json = read_json(&program);
    let entry = first_entry(&json);
    assert_eq!(entry["id"], id.as_str());
    assert_eq!(entry["include"], false);
    assert_ne!(entry["component"], first_entry(&before)["component"]);

    // moving to exchangeable keeps the module partitioned
    edit(&["place", &id, "exchangeable"]);
    let json = read_json(&program);
    let entries = json["packages"][0]["modules"][0]["entries"]
        .as_array()
        .unwrap();
    assert_eq!(entries[0]["placement"], "exchangeable");
    assert_eq!(entries[0]["id"], id.as_str());
}

#[test]
fn test_edit_unknown_entry_fails() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);
    let before = fs::read_to_string(&program).unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args([
            "edit",
            "toggle-entry",
            "00000000-0000-4000-8000-000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NotFound"));

    assert_eq!(fs::read_to_string(&program).unwrap(), before);
}

fn edit_cmd(config: &Path, program: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    cli()
        .arg("--config")
        .arg(config)
        .arg("--program")
        .arg(program)
        .arg("edit")
        .args(args)
        .assert()
}

fn entry_ids(program: &Value, module: usize) -> Vec<String> {
    program["packages"][0]["modules"][module]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_edit_move_entry_within_module() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);

    // second module holds two elementary entries followed by one exchangeable
    let before = read_json(&program);
    let module = before["packages"][0]["modules"][1]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let ids = entry_ids(&before, 1);
    assert_eq!(ids.len(), 3);

    edit_cmd(&config, &program, &["move-entry", &module, "1", "2"])
        .success()
        .stdout(predicate::str::contains("Moved entry"));

    let after = entry_ids(&read_json(&program), 1);
    assert_eq!(after, vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]);
}

#[test]
fn test_edit_move_entry_unknown_position_fails() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);
    let before = fs::read_to_string(&program).unwrap();
    let module = read_json(&program)["packages"][0]["modules"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    edit_cmd(&config, &program, &["move-entry", &module, "99", "1"])
        .failure()
        .stderr(predicate::str::contains("NotFound"));

    assert_eq!(fs::read_to_string(&program).unwrap(), before);
}

#[test]
fn test_edit_remove_entry() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["enrichment"]);

    let ids = entry_ids(&read_json(&program), 0);
    assert_eq!(ids.len(), 2);

    edit_cmd(&config, &program, &["remove-entry", &ids[1]])
        .success()
        .stdout(predicate::str::contains("Removed entry"));
    assert_eq!(entry_ids(&read_json(&program), 0), vec![ids[0].clone()]);

    // a second removal of the same id finds nothing
    let before = fs::read_to_string(&program).unwrap();
    edit_cmd(&config, &program, &["remove-entry", &ids[1]])
        .failure()
        .stderr(predicate::str::contains("NotFound"));
    assert_eq!(fs::read_to_string(&program).unwrap(), before);
}

#[test]
fn test_edit_package_order() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["puppy_start"]);

    let edit = |args: &[&str]| {
        cli()
            .arg("--config")
            .arg(&config)
            .arg("--program")
            .arg(&program)
            .arg("edit")
            .args(args)
            .assert()
            .success();
    };

    edit(&["add-package", "enrichment"]);
    edit(&["move-package", "2", "1"]);

    let json = read_json(&program);
    assert_eq!(json["packages"][0]["title"], "Verrijking");
    assert_eq!(json["packages"][1]["title"], "Puppystart");

    edit(&["remove-package", "1"]);
    let json = read_json(&program);
    assert_eq!(json["packages"].as_array().unwrap().len(), 1);
    assert_eq!(json["packages"][0]["title"], "Puppystart");
}

#[test]
fn test_quote_prints_breakdown() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    new_program(&config, &program, &["basic_obedience"]);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args([
            "quote",
            "--strategy",
            "weighted-average",
            "--rate",
            "100",
            "--distance-km",
            "12",
            "--home-sessions",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy:           weighted_average"))
        .stdout(predicate::str::contains("Session rate:       € 100.00"))
        .stdout(predicate::str::contains("Quoted:"));
}

#[test]
fn test_export_writes_bundle_and_report() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    let bundle = temp_dir.path().join("out").join("bundle.json");
    let report = temp_dir.path().join("out").join("tally.csv");
    new_program(&config, &program, &["puppy_start", "enrichment"]);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args(["export", "--client", "  Jansen ", "--date", "2026-03-14"])
        .arg("--out")
        .arg(&bundle)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Date:     14-03-2026"))
        .stdout(predicate::str::contains("Client:   Jansen"))
        .stdout(predicate::str::contains("Dog:      —"))
        .stdout(predicate::str::contains("Price:    € "));

    let json = read_json(&bundle);
    assert_eq!(json["overview"]["client_name"], "Jansen");
    assert_eq!(json["overview"]["date_label"], "14-03-2026");
    assert_eq!(json["packages"].as_array().unwrap().len(), 2);
    assert!(json["overview"]["price"].is_object());

    let csv = fs::read_to_string(&report).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "package,minutes_low,minutes_high,sessions_low,sessions_high"
    );
    assert!(lines[1].starts_with("Puppystart,"));
    assert!(lines[2].starts_with("Verrijking,"));
}

#[test]
fn test_export_without_price() {
    let (temp_dir, config) = setup_test_dir();
    let program = temp_dir.path().join("program.json");
    let bundle = temp_dir.path().join("bundle.json");
    new_program(&config, &program, &["enrichment"]);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--program")
        .arg(&program)
        .args(["export", "--no-price", "--out"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Price:").not());

    assert!(read_json(&bundle)["overview"]["price"].is_null());
}
