use std::path::Path;
use std::sync::Arc;

use assert_cmd::Command;
use stepwright_core_types::ActionKind;
use stepwright_repository::{CapturedAction, FileStepRepository, StepRecorder};

fn stepwright(repository: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stepwright").unwrap();
    cmd.env("STEPWRIGHT_REPOSITORY", repository)
        .env_remove("RUST_LOG")
        .args(["--config", "no-such-config.yaml", "--log-level", "warn"]);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn normalize_prints_key() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(stepwright(dir.path()).args(["normalize", r#"user enters "admin""#]));
    assert_eq!(out.trim(), "user_enters_param");
}

#[test]
fn params_prints_literals_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(
        stepwright(dir.path()).args(["params", r#"user travels from "Dallas" to "Houston""#]),
    );
    assert_eq!(out.lines().collect::<Vec<_>>(), vec!["Dallas", "Houston"]);
}

#[test]
fn date_uses_requested_format() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(stepwright(dir.path()).args(["date", "2026-01-11", "--format", "YYYY/MM/DD"]));
    assert_eq!(out.trim(), "2026/01/11");
}

#[tokio::test]
async fn show_list_and_forget_use_the_repository() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = StepRecorder::new(Arc::new(FileStepRepository::new(dir.path())));
    recorder.capture(CapturedAction::new(ActionKind::Click));
    recorder.save("user opens the menu").await.unwrap();

    let listed = stdout_of(stepwright(dir.path()).arg("list"));
    assert_eq!(listed.trim(), "user_opens_the_menu");

    let shown = stdout_of(stepwright(dir.path()).args(["show", "User opens the menu"]));
    let plan: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(plan["normalizedStep"], "user_opens_the_menu");
    assert_eq!(plan["actions"][0]["actionType"], "CLICK");

    let forgotten = stdout_of(stepwright(dir.path()).args(["forget", "user opens the menu"]));
    assert!(forgotten.contains("Deleted recorded plan user_opens_the_menu"));
    assert!(!dir.path().join("user_opens_the_menu.json").exists());

    let shown = stdout_of(stepwright(dir.path()).args(["show", "user opens the menu"]));
    assert!(shown.starts_with("No recorded plan for user_opens_the_menu"));
}

#[test]
fn record_saves_captured_lines_as_a_plan() {
    let dir = tempfile::tempdir().unwrap();
    let captured = dir.path().join("captured.jsonl");
    std::fs::write(
        &captured,
        concat!(
            r#"{"actionType":"TYPE","element":{"id":"city"},"value":"Dallas"}"#,
            "\n\n",
            r#"{"actionType":"CLICK","element":{"id":"search"}}"#,
            "\n",
        ),
    )
    .unwrap();
    let repository = dir.path().join("steps");

    let out = stdout_of(stepwright(&repository).args([
        "record",
        r#"user searches for "Dallas""#,
        captured.to_str().unwrap(),
    ]));
    assert_eq!(out.trim(), "Saved 2 actions as user_searches_for_param");

    let plan: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(repository.join("user_searches_for_param.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(plan["actions"][0]["value"], "___RUNTIME_PARAMETER___");
    assert_eq!(plan["actions"][1]["actionType"], "CLICK");

    stepwright(&repository)
        .args(["record", r#"user searches for "Austin""#, captured.to_str().unwrap()])
        .assert()
        .failure();
}
