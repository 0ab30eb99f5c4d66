use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bin() -> Command {
    let path = assert_cmd::cargo::cargo_bin!("concierge");
    Command::new(path)
}

fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let corpus = dir.join("hotel_faq.json");
    fs::write(
        &corpus,
        r#"[
            {"question": "What time is check-in?", "answer": "Check-in starts at 3:00 PM."},
            {"question": "Is breakfast included?", "answer": "Yes, from 7 to 10 AM."}
        ]"#,
    )
    .unwrap();
    corpus
}

fn build_snapshot(dir: &Path) -> std::path::PathBuf {
    let corpus = write_corpus(dir);
    let snapshot = dir.join("index.json");
    bin()
        .args([
            "build-index",
            "--input",
            corpus.to_str().unwrap(),
            "--output",
            snapshot.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("entries=2"));
    snapshot
}

#[test]
fn query_answers_a_paraphrased_question() {
    let dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(dir.path());

    bin()
        .args([
            "query",
            "--index",
            snapshot.to_str().unwrap(),
            "--question",
            "when can I check in",
            "--threshold",
            "0.1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision=Hit"))
        .stdout(predicate::str::contains("answer=Check-in starts at 3:00 PM."));
}

#[test]
fn query_falls_back_below_threshold() {
    let dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(dir.path());

    bin()
        .args([
            "query",
            "--index",
            snapshot.to_str().unwrap(),
            "--question",
            "do you have a pool",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision=Miss"))
        .stdout(predicate::str::contains("I couldn't find a close FAQ match."));
}

#[test]
fn build_index_rejects_malformed_corpus() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("bad.json");
    fs::write(&corpus, r#"[{"question": "", "answer": "orphan"}]"#).unwrap();

    bin()
        .args([
            "build-index",
            "--input",
            corpus.to_str().unwrap(),
            "--output",
            dir.path().join("out.json").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn eval_reports_pass_rate() {
    let dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(dir.path());
    let cases = dir.path().join("cases.json");
    fs::write(
        &cases,
        r#"[
            {"case_id": "checkin", "question": "when can I check in",
             "expected_decision": "hit", "expected_question": "What time is check-in?"},
            {"case_id": "pool", "question": "do you have a pool",
             "expected_decision": "miss"}
        ]"#,
    )
    .unwrap();

    bin()
        .args([
            "eval",
            "--index",
            snapshot.to_str().unwrap(),
            "--cases",
            cases.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("total=2 passed=2 failed=0"))
        .stdout(predicate::str::contains("meets_threshold=true"));
}

#[test]
fn positive_review_earns_a_coupon() {
    bin()
        .args([
            "review",
            "--text",
            "The pasta was delicious and the waiter was friendly",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("action=FreeCoupon"))
        .stdout(predicate::str::contains("coupon=MEAL-"));
}

#[test]
fn negative_review_with_amount_computes_refund() {
    bin()
        .args([
            "review",
            "--text",
            "cold stale fries and rude service",
            "--amount",
            "40",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("action=Refund15"))
        .stdout(predicate::str::contains("refund_amount=6.00"));
}

#[test]
fn review_json_output_is_valid_json() {
    let assert = bin()
        .args([
            "review",
            "--text",
            "The pasta was delicious and the waiter was friendly",
            "--output",
            "json",
        ])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["action"], "free_coupon");
    assert!(json["coupon"]["code"]
        .as_str()
        .unwrap()
        .starts_with("MEAL-"));
}

#[test]
fn ask_routes_questions_and_reviews() {
    let dir = TempDir::new().unwrap();
    let snapshot = build_snapshot(dir.path());

    bin()
        .args([
            "ask",
            "--index",
            snapshot.to_str().unwrap(),
            "--text",
            "when can I check in",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=Retrieval"))
        .stdout(predicate::str::contains("Check-in starts at 3:00 PM."));

    bin()
        .args([
            "ask",
            "--index",
            snapshot.to_str().unwrap(),
            "--text",
            "The food was cold and the service was terrible",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind=Review"));
}
