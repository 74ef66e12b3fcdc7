//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn surveytally(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("surveytally").unwrap();
    cmd.current_dir(dir).env_remove("SURVEYTALLY_STORE");
    cmd
}

fn write_document(dir: &Path, value: &Value) {
    std::fs::write(dir.join("content.json"), value.to_string()).unwrap();
}

fn read_document(dir: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join("content.json")).unwrap()).unwrap()
}

fn fair_survey() -> Value {
    json!({
        "homepage": { "hero": "Selamat datang" },
        "surveySettings": { "questions": ["Pelayanan ramah", "Waktu tunggu"] },
        "surveyResponses": [
            { "id": "a", "name": "Ani", "submittedAt": "2024-02-01T09:00:00Z",
              "responses": { "0": "K", "1": "C" }, "suggestions": "Tambah loket" },
            { "id": "b", "name": "Budi", "submittedAt": "2024-02-03T10:30:00Z",
              "responses": { "0": "B", "1": "BS", "5": "BS" }, "suggestions": "" }
        ]
    })
}

#[test]
fn analyze_writes_markdown_report() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), &fair_survey());

    surveytally(dir.path())
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Responses: 2"))
        .stdout(predicate::str::contains("Report saved to"));

    let report = std::fs::read_to_string(dir.path().join("survey_report.md")).unwrap();
    assert!(report.contains("Pelayanan ramah"));
    assert!(report.contains("Tambah loket"));
    assert!(report.contains("## Data Quality"));
}

#[test]
fn analyze_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), &fair_survey());

    let output = surveytally(dir.path())
        .args(["analyze", "--format", "json", "--stdout"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // (1 + 2 + 3 + 4 + 4) / 5 = 2.8
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["analysis"]["summary"]["predicate"], json!("Fair"));
    assert_eq!(report["analysis"]["summary"]["answer_count"], json!(5));
    assert_eq!(report["analysis"]["questions"][0]["mean"], json!(2.0));
    assert_eq!(report["analysis"]["questions"][1]["tier"], json!("Good"));
}

#[test]
fn analyze_fail_below_threshold() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), &fair_survey());

    surveytally(dir.path())
        .args(["analyze", "--stdout", "--fail-below", "good"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("below"));

    surveytally(dir.path())
        .args(["analyze", "--stdout", "--fail-below", "fair"])
        .assert()
        .success();
}

#[test]
fn analyze_missing_document_fails() {
    let dir = TempDir::new().unwrap();

    surveytally(dir.path())
        .args(["--store", "missing.json", "analyze"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn questions_add_edit_remove() {
    let dir = TempDir::new().unwrap();

    surveytally(dir.path())
        .args(["questions", "add", "Loket mudah ditemukan"])
        .assert()
        .success();
    surveytally(dir.path())
        .args(["questions", "add", "Petugas sopan"])
        .assert()
        .success();
    surveytally(dir.path())
        .args(["questions", "edit", "1", "Petugas sopan dan ramah"])
        .assert()
        .success();

    surveytally(dir.path())
        .args(["questions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] Loket mudah ditemukan"))
        .stdout(predicate::str::contains("[1] Petugas sopan dan ramah"));

    surveytally(dir.path())
        .args(["questions", "remove", "0"])
        .assert()
        .success();
    assert_eq!(
        read_document(dir.path())["surveySettings"]["questions"],
        json!(["Petugas sopan dan ramah"])
    );

    surveytally(dir.path())
        .args(["questions", "remove", "4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn submit_appends_response_and_keeps_other_content() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), &fair_survey());

    surveytally(dir.path())
        .args([
            "submit",
            "--name",
            "Citra",
            "--answer",
            "0=BS",
            "--answer",
            "1=B",
            "--suggestion",
            "Sudah bagus",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded response"));

    let doc = read_document(dir.path());
    assert_eq!(doc["homepage"], json!({ "hero": "Selamat datang" }));

    let responses = doc["surveyResponses"].as_array().unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[2]["name"], json!("Citra"));
    assert_eq!(responses[2]["responses"], json!({ "0": "BS", "1": "B" }));
    assert_eq!(responses[2]["suggestions"], json!("Sudah bagus"));
}

#[test]
fn submit_rejects_malformed_answer() {
    let dir = TempDir::new().unwrap();

    surveytally(dir.path())
        .args(["submit", "--name", "Dedi", "--answer", "BS"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("INDEX=CODE"));

    assert!(!dir.path().join("content.json").exists());
}

#[test]
fn init_config_creates_file_once() {
    let dir = TempDir::new().unwrap();

    surveytally(dir.path())
        .arg("init-config")
        .assert()
        .success();
    assert!(dir.path().join(".surveytally.toml").exists());

    surveytally(dir.path())
        .arg("init-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_file_sets_store_path() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("baak.json"),
        fair_survey().to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".surveytally.toml"),
        "[store]\npath = \"data/baak.json\"\n",
    )
    .unwrap();

    surveytally(dir.path())
        .args(["questions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] Waktu tunggu"));
}

#[test]
fn config_verbose_enables_debug_logging() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), &fair_survey());
    std::fs::write(
        dir.path().join(".surveytally.toml"),
        "[general]\nverbose = true\n",
    )
    .unwrap();

    surveytally(dir.path())
        .args(["questions"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Arguments"))
        .stderr(predicate::str::contains("Loaded default config"));

    surveytally(dir.path())
        .args(["-q", "questions"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Arguments").not());
}
