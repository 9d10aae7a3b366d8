//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bandcheck() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("bandcheck").unwrap()
}

fn test_sets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-sets")
}

/// Write a config that serves the repository's bundled test sets.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("bandcheck.toml");
    std::fs::write(
        &path,
        format!(
            "tests_dir = '{}'\noutput_dir = '{}'\ndrafts_dir = '{}'\n",
            test_sets_dir().display(),
            dir.join("results").display(),
            dir.join("drafts").display()
        ),
    )
    .unwrap();
    path
}

/// The single file with the given extension in a directory.
fn only_file(dir: &Path, extension: &str) -> PathBuf {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect();
    assert_eq!(files.len(), 1, "expected one .{extension} file in {}", dir.display());
    files.remove(0)
}

#[test]
fn validate_reading_test() {
    bandcheck()
        .arg("validate")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("reading test, 2 sections, 6 questions"))
        .stdout(predicate::str::contains("All tests valid"));
}

#[test]
fn validate_directory() {
    bandcheck()
        .arg("validate")
        .arg("--test")
        .arg("../../test-sets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Academic Reading 1"))
        .stdout(predicate::str::contains("Practice Listening 1"))
        .stdout(predicate::str::contains("All tests valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"sections": [{"sectionId": "s", "questions": [
            {"id": 1, "questionNumber": 1, "answers": []},
            {"id": 1, "questionNumber": 2, "answers": ["x"]}
        ]}]}"#,
    )
    .unwrap();

    bandcheck()
        .arg("validate")
        .arg("--test")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no accepted answers"))
        .stdout(predicate::str::contains("duplicate question ID: 1"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    bandcheck()
        .arg("validate")
        .arg("--test")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_reading_from_file() {
    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .arg("--answers")
        .arg("../../answers/practice-reading-1.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Academic Reading 1 (reading test)"))
        .stdout(predicate::str::contains("4/6"))
        .stdout(predicate::str::contains("67%"))
        .stdout(predicate::str::contains("Estimated band: 6.5"))
        .stdout(predicate::str::contains("Incorrect answers"))
        .stdout(predicate::str::contains("Beijing"));
}

#[test]
fn score_listening_by_id_from_bundled_source() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("practice-listening-1")
        .arg("--answers")
        .arg("../../answers/practice-listening-1.json")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Listening 1 (listening test)"))
        .stdout(predicate::str::contains("Part 1: Booking a Hotel Room"))
        .stdout(predicate::str::contains("3/6"))
        .stdout(predicate::str::contains("50%"));
}

#[test]
fn score_unknown_test_id_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("no-such-test")
        .arg("--answers")
        .arg("../../answers/practice-reading-1.json")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("test not found"));
}

#[test]
fn score_writes_all_formats() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .arg("--answers")
        .arg("../../answers/practice-reading-1.json")
        .arg("--format")
        .arg("all")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Attempt saved to"))
        .stderr(predicate::str::contains("HTML report"))
        .stderr(predicate::str::contains("Markdown report"));

    let json = std::fs::read_to_string(only_file(&output, "json")).unwrap();
    let attempt: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(attempt["report"]["totalScore"], 4);
    assert_eq!(attempt["report"]["totalQuestions"], 6);
    assert_eq!(attempt["test"]["id"], "practice-reading-1");

    let html = std::fs::read_to_string(only_file(&output, "html")).unwrap();
    assert!(html.contains("The Silk Road"));

    let md = std::fs::read_to_string(only_file(&output, "md")).unwrap();
    assert!(md.contains("**Score:** 4/6 (67%)"));
}

#[test]
fn compare_attempts_detects_regression() {
    let dir = TempDir::new().unwrap();
    let baseline_dir = dir.path().join("baseline");
    let current_dir = dir.path().join("current");

    let retake = dir.path().join("retake.json");
    std::fs::write(
        &retake,
        r#"[
            {"questionId": 1, "answer": "cotton"},
            {"questionId": 2, "answer": "caravans"},
            {"questionId": 3, "answer": "xi'an"},
            {"questionId": 4, "answer": "TRUE"},
            {"questionId": 6, "answer": ["A", "C"]}
        ]"#,
    )
    .unwrap();

    for (answers, output) in [
        (Path::new("../../answers/practice-reading-1.json"), &baseline_dir),
        (retake.as_path(), &current_dir),
    ] {
        bandcheck()
            .arg("score")
            .arg("--test")
            .arg("../../test-sets/practice-reading-1.json")
            .arg("--answers")
            .arg(answers)
            .arg("--format")
            .arg("json")
            .arg("--output")
            .arg(output)
            .assert()
            .success();
    }

    let baseline = only_file(&baseline_dir, "json");
    let current = only_file(&current_dir, "json");

    bandcheck()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("score 4 -> 4 (+0)"))
        .stdout(predicate::str::contains("1 newly correct, 1 newly incorrect"))
        .stdout(predicate::str::contains("Q1 (passage-1)"));

    bandcheck()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--fail-on-regression")
        .assert()
        .failure();

    bandcheck()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scoreDelta\": 0"));
}

#[test]
fn compare_nonexistent_attempt() {
    bandcheck()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn draft_set_show_score_clear() {
    let dir = TempDir::new().unwrap();
    let draft = dir.path().join("draft.json");

    let set = |question: &str, values: &[&str]| {
        bandcheck()
            .arg("draft")
            .arg("set")
            .arg("--draft")
            .arg(&draft)
            .arg("--question")
            .arg(question)
            .args(values)
            .assert()
            .success();
    };

    set("1", &["silk"]);
    set("2", &["camel"]);
    set("6", &["A", "C"]);
    // An empty value list clears the answer.
    set("2", &[]);

    bandcheck()
        .arg("draft")
        .arg("show")
        .arg("--draft")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("silk"))
        .stdout(predicate::str::contains("A, C"))
        .stdout(predicate::str::contains("camel").not())
        .stdout(predicate::str::contains("2 answer(s)"));

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .arg("--answers")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/6"));

    bandcheck()
        .arg("draft")
        .arg("clear")
        .arg("--draft")
        .arg(&draft)
        .assert()
        .success();
    assert!(!draft.exists());
}

#[test]
fn draft_single_pick_on_choose_two_scores_incorrect() {
    let dir = TempDir::new().unwrap();
    let draft = dir.path().join("draft.json");

    bandcheck()
        .arg("draft")
        .arg("set")
        .arg("--draft")
        .arg(&draft)
        .arg("--question")
        .arg("6")
        .arg("--multi")
        .arg("A")
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&draft).unwrap()).unwrap();
    assert_eq!(saved[0]["answer"], serde_json::json!(["A"]));

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .arg("--answers")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("0/6"));

    // Both picks as a set earn the mark.
    bandcheck()
        .arg("draft")
        .arg("set")
        .arg("--draft")
        .arg(&draft)
        .arg("--question")
        .arg("6")
        .arg("--multi")
        .args(["C", "A"])
        .assert()
        .success();

    bandcheck()
        .arg("score")
        .arg("--test")
        .arg("../../test-sets/practice-reading-1.json")
        .arg("--answers")
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("1/6"));
}

#[test]
fn draft_by_test_id_uses_drafts_dir() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bandcheck()
        .arg("draft")
        .arg("set")
        .arg("--test")
        .arg("practice-listening-1")
        .arg("--config")
        .arg(&config)
        .arg("--section")
        .arg("part-2")
        .arg("--question")
        .arg("1")
        .arg("B")
        .assert()
        .success()
        .stdout(predicate::str::contains("part-2/1 = B"));

    assert!(dir.path().join("drafts/practice-listening-1.json").exists());
}

#[test]
fn draft_requires_target() {
    bandcheck()
        .arg("draft")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--draft or --test"));
}

#[test]
fn list_bundled_tests() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bandcheck()
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("practice-listening-1"))
        .stdout(predicate::str::contains("practice-reading-1"))
        .stdout(predicate::str::contains("2 test(s) from bundled source"));
}

#[test]
fn list_api_without_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bandcheck()
        .arg("list")
        .arg("--source")
        .arg("api")
        .arg("--config")
        .arg(&config)
        .env_remove("BANDCHECK_API_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("[api]"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    bandcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created bandcheck.toml"))
        .stdout(predicate::str::contains("Created test-sets/example.json"));

    assert!(dir.path().join("bandcheck.toml").exists());
    assert!(dir.path().join("test-sets/example.json").exists());
    assert!(dir.path().join("answers/example.json").exists());

    // The starter files score end to end.
    bandcheck()
        .current_dir(dir.path())
        .arg("score")
        .arg("--test")
        .arg("example")
        .arg("--answers")
        .arg("answers/example.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/3"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    bandcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    bandcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    bandcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("IELTS practice test answer scoring"));
}

#[test]
fn version_output() {
    bandcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bandcheck"));
}
