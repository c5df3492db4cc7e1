use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "entities": {
    "Person": [
      { "name": "id", "type": "Long", "identifier": true },
      { "name": "lastName", "type": "String" },
      { "name": "age", "type": "int" },
      { "name": "address", "type": "Address" }
    ],
    "Address": [
      { "name": "city", "type": "String" }
    ]
  }
}"#;

/// A scratch directory holding `schema.json`, used as both working and home
/// directory so no outside configuration leaks in
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.json"), SCHEMA).unwrap();
    dir
}

fn finderq(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("finderq").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("FINDERQ_SCHEMA")
        .env_remove("FINDERQ_ENTITY")
        .env_remove("FINDERQ_MAX_RELATION_DEPTH")
        .env_remove("FINDERQ_CACHE_CAPACITY")
        .env_remove("FINDERQ_VERBOSITY");
    cmd
}

fn person(dir: &Path) -> Command {
    let mut cmd = finderq(dir);
    cmd.args(["--schema", "schema.json", "--entity", "Person"]);
    cmd
}

#[test]
fn check_accepts_valid_expressions() {
    let dir = workspace();
    person(dir.path())
        .args(["check", "findByLastName", "findDistinctByAgeOrderByLastNameDesc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("findByLastName: valid"))
        .stdout(predicate::str::contains(
            "findDistinctByAgeOrderByLastNameDesc: valid",
        ));
}

#[test]
fn check_reports_invalid_expressions_with_hints() {
    let dir = workspace();
    person(dir.path())
        .args(["check", "findByLastName", "findByLastNam"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("findByLastNam: invalid"))
        .stdout(predicate::str::contains("  findByLastName"))
        .stderr(predicate::str::contains("1 of 2 expressions are invalid"));
}

#[test]
fn check_reports_structural_errors() {
    let dir = workspace();
    person(dir.path())
        .args(["check", "findTop0ByLastName"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("findTop0ByLastName: error:"));
}

#[test]
fn check_json_output() {
    let dir = workspace();
    let output = person(dir.path())
        .args(["--format", "json", "check", "findByAge"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["expression"], "findByAge");
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[0]["canonical"], "findByAge");
}

#[test]
fn suggest_lists_continuations() {
    let dir = workspace();
    person(dir.path())
        .args(["suggest", "findByAgeGre"])
        .assert()
        .success()
        .stdout(predicate::str::contains("findByAgeGreaterThan\n"))
        .stdout(predicate::str::contains("findByAgeGreaterThanEqual\n"))
        .stdout(predicate::str::contains("findByAgeLessThan").not());
}

#[test]
fn suggest_follows_relations() {
    let dir = workspace();
    let output = person(dir.path())
        .args(["--format", "json", "suggest", "findByAddress"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let candidates: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(candidates.contains(&"findByAddressCity".to_string()));
}

#[test]
fn suggest_from_empty_input() {
    let dir = workspace();
    person(dir.path())
        .arg("suggest")
        .assert()
        .success()
        .stdout("find\nread\nquery\ncount\n");
}

#[test]
fn params_numbers_repeated_names() {
    let dir = workspace();
    person(dir.path())
        .args(["params", "findByAgeBetweenAndLastNameIn"])
        .assert()
        .success()
        .stdout("int age1\nint age2\nList<String> lastName\n");
}

#[test]
fn schema_and_entity_from_environment() {
    let dir = workspace();
    finderq(dir.path())
        .env("FINDERQ_SCHEMA", "schema.json")
        .env("FINDERQ_ENTITY", "Person")
        .args(["check", "findByAddressCity"])
        .assert()
        .success();
}

#[test]
fn relation_depth_flag_limits_nesting() {
    let dir = workspace();
    person(dir.path())
        .args(["--max-relation-depth", "0", "check", "findByAddressCity"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("findByAddressCity: invalid"));
}

#[test]
fn config_file_in_working_directory() {
    let dir = workspace();
    fs::write(
        dir.path().join("finderq.toml"),
        "[schema]\npath = \"schema.json\"\nentity = \"Address\"\n",
    )
    .unwrap();

    finderq(dir.path())
        .args(["check", "findByCity"])
        .assert()
        .success();
}

#[test]
fn missing_schema_is_reported() {
    let dir = workspace();
    finderq(dir.path())
        .args(["--entity", "Person", "check", "findByAge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No schema file given"));
}

#[test]
fn unknown_entity_is_reported() {
    let dir = workspace();
    finderq(dir.path())
        .args(["--schema", "schema.json", "--entity", "Robot", "check", "findByAge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown entity 'Robot'"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = workspace();
    fs::write(dir.path().join("finderq.yaml"), "compiler:\n  cache_capacity: 0\n").unwrap();

    person(dir.path())
        .args(["check", "findByAge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cache capacity must be greater than 0"));
}

#[test]
fn entities_lists_queryable_properties() {
    let dir = workspace();
    finderq(dir.path())
        .args(["--schema", "schema.json", "entities"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Person\n  lastName: String (text)"))
        .stdout(predicate::str::contains("  id:").not());
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = workspace();
    finderq(dir.path())
        .args(["config", "init", "generated.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(dir.path().join("generated.toml").exists());

    finderq(dir.path())
        .args(["config", "init", "generated.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    finderq(dir.path())
        .args(["config", "check", "generated.toml"])
        .assert()
        .success();
}

#[test]
fn completions_and_version() {
    let dir = workspace();
    finderq(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finderq"));

    finderq(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("finderq 0.1.0"));
}
