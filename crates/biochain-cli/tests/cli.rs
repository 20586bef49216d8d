use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// One supplier (1000 Mg) ten km from one plant at rate 1.
///
/// With default parameters and a goal of 232 000 L (1000 Mg at 232 L/Mg)
/// the plan ships 1000 Mg in two truck slots:
/// 10 000 transport + 20 000 handling + 130 956 797 plant investment.
fn write_direct_data(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("suppliers.csv"), "id,supply\n1,1000\n").unwrap();
    fs::write(dir.join("plants.csv"), "id\n1\n").unwrap();
    fs::write(
        dir.join("roads_s_p.csv"),
        "origin,destination,distance,rate\n1,1,10,1\n",
    )
    .unwrap();
}

fn biochain() -> Command {
    Command::cargo_bin("biochain").unwrap()
}

#[test]
fn solve_prints_minimal_cost_and_writes_json() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    write_direct_data(&data);
    let out = tmp.path().join("solution.json");

    biochain()
        .args([
            "solve",
            "--data",
            data.to_str().unwrap(),
            "--variant",
            "direct",
            "--goal-liters",
            "232000",
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Minimal Total Cost: $130986797"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["variant"], "direct");
    assert_eq!(json["flows"][0]["used_slots"], 2);
}

#[test]
fn solve_reports_infeasible_goal_without_failing() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args([
            "solve",
            "--data",
            tmp.path().to_str().unwrap(),
            "--goal-liters",
            "464000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No solution found."));
}

#[test]
fn solve_detailed_shows_cost_breakdown() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args([
            "solve",
            "--data",
            tmp.path().to_str().unwrap(),
            "--goal-liters",
            "232000",
            "--handling-policy",
            "per-load",
            "--detailed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Handling:   20000.00"))
        .stdout(predicate::str::contains("Built plants: Facility 1"));
}

#[test]
fn solve_hubbed_without_hubs_is_a_configuration_error() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args([
            "solve",
            "--data",
            tmp.path().to_str().unwrap(),
            "--variant",
            "hubbed",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs hubs"));
}

#[test]
fn inspect_prints_model_size() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args([
            "inspect",
            "--data",
            tmp.path().to_str().unwrap(),
            "--goal-liters",
            "232000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Routes: 1 (1 truck, 0 train)"))
        .stdout(predicate::str::contains("Variables: 7 (3 continuous, 4 binary)"));
}

#[test]
fn validate_accepts_clean_data() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args(["validate", "--data", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 1 suppliers, 0 hubs, 1 plants, 1 arcs"))
        .stdout(predicate::str::contains("No issues"));
}

#[test]
fn validate_fails_on_bad_rows() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());
    fs::write(tmp.path().join("suppliers.csv"), "id,supply\n1,lots\n").unwrap();

    biochain()
        .args(["validate", "--data", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error:parse]"))
        .stderr(predicate::str::contains("error"));
}

#[test]
fn validate_checks_variant_requirements() {
    let tmp = tempdir().unwrap();
    write_direct_data(tmp.path());

    biochain()
        .args([
            "validate",
            "--data",
            tmp.path().to_str().unwrap(),
            "--variant",
            "hubbed",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("hubbed scenario needs hubs"));
}

const SCENARIO_SET: &str = r#"
version: 1
data_dir: data
defaults:
  variant: direct
scenarios:
  - scenario_id: base
    overrides:
      production_goal: 232000
  - scenario_id: short
    description: goal beyond total supply
    overrides:
      production_goal: 464000
"#;

#[test]
fn run_solves_every_scenario_and_writes_manifest() {
    let tmp = tempdir().unwrap();
    write_direct_data(&tmp.path().join("data"));
    let spec = tmp.path().join("set.yaml");
    fs::write(&spec, SCENARIO_SET).unwrap();
    let out_dir = tmp.path().join("out");

    biochain()
        .args([
            "run",
            "--scenarios",
            spec.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("$130986797"))
        .stdout(predicate::str::contains("infeasible"));

    assert!(out_dir.join("scenario_manifest.json").exists());
    assert!(out_dir.join("base").join("solution.json").exists());
    assert!(out_dir.join("short").join("solution.json").exists());
}

#[test]
fn scenarios_validate_and_list() {
    let tmp = tempdir().unwrap();
    let spec = tmp.path().join("set.yaml");
    fs::write(&spec, SCENARIO_SET).unwrap();

    biochain()
        .args(["scenarios", "validate", spec.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (2 scenarios)"));

    biochain()
        .args(["scenarios", "list", spec.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("short"))
        .stdout(predicate::str::contains("per-dispatched-slot"));
}

#[test]
fn scenarios_validate_rejects_duplicate_ids() {
    let tmp = tempdir().unwrap();
    let spec = tmp.path().join("dup.yaml");
    fs::write(
        &spec,
        "defaults:\n  variant: direct\nscenarios:\n  - scenario_id: a\n  - scenario_id: a\n",
    )
    .unwrap();

    biochain()
        .args(["scenarios", "validate", spec.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate scenario_id"));
}
