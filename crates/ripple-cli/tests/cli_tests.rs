//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn ripple(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("ripple").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RIPPLE_CATALOG_URL")
        .env_remove("RIPPLE_CATALOG_DIR")
        .env_remove("RIPPLE_DB")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp directory holding the `init` sample config and catalog.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    ripple(dir.path()).arg("init").assert().success();
    dir
}

/// Run `generate` and return the new exam id.
fn generate(dir: &Path, args: &[&str]) -> String {
    let output = ripple(dir).arg("generate").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Saved exam "))
        .expect("no exam id in output")
        .trim()
        .to_string()
}

fn show_json(dir: &Path, id: &str) -> Value {
    let output = ripple(dir).args(["show", id, "--json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn ref_ids(exam: &Value) -> Vec<String> {
    exam["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["refId"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    ripple(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ripple.toml"))
        .stdout(predicate::str::contains("Created catalog/banks/math-9.json"));

    assert!(dir.path().join("ripple.toml").exists());
    assert!(dir.path().join("catalog/manifest.json").exists());
    assert!(dir.path().join("catalog/tokens.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    ripple(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_bank() {
    let dir = initialized();

    ripple(dir.path())
        .args(["validate", "--route", "math-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 items"))
        .stdout(predicate::str::contains("Item bank valid."));
}

#[test]
fn validate_reports_bank_problems() {
    let dir = TempDir::new().unwrap();
    let bank = dir.path().join("broken.json");
    std::fs::write(
        &bank,
        r#"{"items": [
            {"id": "q1", "bodyHtml": "<p>a</p>", "estimatedMinutes": 2},
            {"id": "q1", "bodyHtml": "<p>b</p>", "estimatedMinutes": 2}
        ]}"#,
    )
    .unwrap();

    ripple(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate item ID: q1"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_missing_bank_file() {
    let dir = TempDir::new().unwrap();

    ripple(dir.path())
        .args(["validate", "--bank", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn options_lists_bank_values() {
    let dir = initialized();

    ripple(dir.path())
        .args(["options", "--route", "math-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--theme"))
        .stdout(predicate::str::contains("algebra, geometry, statistics"))
        .stdout(predicate::str::contains("tk-statistics"));
}

#[test]
fn topics_lists_route_catalog() {
    let dir = initialized();

    ripple(dir.path())
        .args(["topics", "--route", "math-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Geometry"))
        .stdout(predicate::str::contains("3 topic(s)"));
}

#[test]
fn topics_unknown_route() {
    let dir = initialized();

    ripple(dir.path())
        .args(["topics", "--route", "history-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("history-1"));
}

#[test]
fn generate_requires_a_bank() {
    let dir = initialized();

    ripple(dir.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no item bank selected"));
}

#[test]
fn generate_with_seed_is_reproducible() {
    let dir = initialized();
    let args = ["--route", "math-9", "--count", "5", "--seed", "42"];

    let first = generate(dir.path(), &args);
    let second = generate(dir.path(), &args);
    assert_ne!(first, second);

    let a = show_json(dir.path(), &first);
    let b = show_json(dir.path(), &second);
    assert_eq!(ref_ids(&a).len(), 5);
    assert_eq!(ref_ids(&a), ref_ids(&b));
    assert_eq!(a["seed"], 42);
    assert_eq!(a["bankRoute"], "math-9");
}

#[test]
fn generate_from_bank_file() {
    let dir = initialized();

    let id = generate(
        dir.path(),
        &["--bank", "catalog/banks/math-9.json", "--count", "3", "--title", "Quiz"],
    );
    let exam = show_json(dir.path(), &id);
    assert_eq!(ref_ids(&exam).len(), 3);
    assert_eq!(exam["title"], "Quiz");
    assert!(exam.get("bankRoute").map_or(true, Value::is_null));
}

#[test]
fn generate_respects_filters() {
    let dir = initialized();

    let id = generate(
        dir.path(),
        &["--route", "math-9", "--count", "3", "--theme", "geometry"],
    );
    let exam = show_json(dir.path(), &id);
    let mut ids = ref_ids(&exam);
    ids.sort();
    assert_eq!(ids, vec!["m9-007", "m9-008", "m9-009"]);
}

#[test]
fn generate_warns_when_nothing_matches() {
    let dir = initialized();

    ripple(dir.path())
        .args(["generate", "--route", "math-9", "--count", "3", "--theme", "astronomy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("only 0 of 3 slots filled"));
}

#[test]
fn generate_rejects_invalid_seed() {
    let dir = initialized();

    ripple(dir.path())
        .args(["generate", "--route", "math-9", "--seed", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid seed"));
}

#[test]
fn locked_slot_survives_regenerate() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "5", "--seed", "42"]);
    let before = ref_ids(&show_json(dir.path(), &id));

    ripple(dir.path())
        .args(["lock", id.as_str(), "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot 2 locked"));

    for seed in ["7", "1234", "99"] {
        ripple(dir.path())
            .args(["regenerate", id.as_str(), "--seed", seed])
            .assert()
            .success();
        let exam = show_json(dir.path(), &id);
        assert_eq!(ref_ids(&exam)[2], before[2]);
        assert_eq!(exam["items"][2]["locked"], true);
        assert_eq!(exam["seed"].as_u64(), Some(seed.parse().unwrap()));
    }
}

#[test]
fn locked_slot_keeps_its_index_when_filters_match_nothing() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "5", "--seed", "42"]);
    let before = ref_ids(&show_json(dir.path(), &id));
    ripple(dir.path()).args(["lock", id.as_str(), "2"]).assert().success();

    ripple(dir.path())
        .args(["regenerate", id.as_str(), "--theme", "astronomy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("only 1 of 5 slots filled"));
    let starved = show_json(dir.path(), &id);
    assert_eq!(ref_ids(&starved).len(), 3);
    assert_eq!(ref_ids(&starved)[2], before[2]);

    ripple(dir.path())
        .args(["regenerate", id.as_str(), "--clear-filters", "--seed", "7"])
        .assert()
        .success();
    let widened = show_json(dir.path(), &id);
    let ids = ref_ids(&widened);
    assert_eq!(ids.len(), 5);
    assert_eq!(ids[2], before[2]);
    assert_eq!(widened["items"][2]["locked"], true);
    assert_eq!(widened["seed"], 7);
}

#[test]
fn clear_filters_drops_stored_filters() {
    let dir = initialized();
    let id = generate(
        dir.path(),
        &["--route", "math-9", "--count", "3", "--theme", "geometry"],
    );
    assert_eq!(show_json(dir.path(), &id)["filters"]["themes"][0], "geometry");

    ripple(dir.path())
        .args(["regenerate", id.as_str(), "--clear-filters"])
        .assert()
        .success();
    let exam = show_json(dir.path(), &id);
    assert!(exam["filters"].get("themes").is_none());
    assert_eq!(ref_ids(&exam).len(), 3);
}

#[test]
fn clear_filters_conflicts_with_filter_flags() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "2"]);

    ripple(dir.path())
        .args(["regenerate", id.as_str(), "--clear-filters", "--theme", "algebra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn replace_refuses_locked_slot() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "4"]);

    ripple(dir.path()).args(["lock", id.as_str(), "1"]).assert().success();
    ripple(dir.path())
        .args(["replace", id.as_str(), "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot 1 is locked"));
}

#[test]
fn replace_swaps_unlocked_slot() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "4"]);
    let before = ref_ids(&show_json(dir.path(), &id));

    ripple(dir.path())
        .args(["replace", id.as_str(), "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot 0"));

    let after = ref_ids(&show_json(dir.path(), &id));
    assert_eq!(after.len(), 4);
    assert_eq!(after[1..], before[1..]);
    assert!(!after[1..].contains(&after[0]));
}

#[test]
fn replace_out_of_range() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "2"]);

    ripple(dir.path())
        .args(["replace", id.as_str(), "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn shuffle_reports_seed() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "3"]);

    ripple(dir.path())
        .args(["shuffle", id.as_str(), "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot 0 alternatives:"));

    let exam = show_json(dir.path(), &id);
    assert!(exam["items"][0]["altShuffleSeed"].is_u64());
}

#[test]
fn summary_json() {
    let dir = initialized();
    let id = generate(
        dir.path(),
        &["--route", "math-9", "--count", "3", "--theme", "statistics"],
    );

    let output = ripple(dir.path())
        .args(["summary", id.as_str(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(summary["totalSlots"], 3);
    assert_eq!(summary["totalMinutes"], 9.5);
    assert_eq!(summary["averageDifficulty"], 2.0);
    assert_eq!(summary["tokens"]["tk-statistics"], "Data literacy");
}

#[test]
fn summary_table() {
    let dir = initialized();
    let id = generate(dir.path(), &["--route", "math-9", "--count", "4"]);

    ripple(dir.path())
        .args(["summary", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated time"))
        .stdout(predicate::str::contains("Average difficulty"));
}

#[test]
fn list_and_delete() {
    let dir = initialized();

    ripple(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No exams saved."));

    let id = generate(dir.path(), &["--route", "math-9", "--title", "Midterm"]);
    ripple(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Midterm"))
        .stdout(predicate::str::contains("1 exam(s)"));

    ripple(dir.path()).args(["delete", id.as_str()]).assert().success();
    ripple(dir.path())
        .args(["show", id.as_str(), "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no exam with id"));
}

#[test]
fn export_then_import_into_another_store() {
    let dir = initialized();
    generate(dir.path(), &["--route", "math-9", "--title", "Exported"]);
    let file = dir.path().join("out/exams.json");

    ripple(dir.path())
        .arg("export")
        .arg("-o")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 exam(s)"));

    ripple(dir.path())
        .arg("--db")
        .arg("other.db")
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 exam(s) imported."));

    ripple(dir.path())
        .args(["list", "--db", "other.db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));
}

#[test]
fn import_rejects_non_exam_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("junk.json");
    std::fs::write(&file, r#"{"hello": "world"}"#).unwrap();

    ripple(dir.path())
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither an exam nor a list of exams"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    ripple(dir.path())
        .args(["list", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
