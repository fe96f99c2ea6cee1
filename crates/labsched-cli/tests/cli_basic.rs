//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated data directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const ROSTER: &str = "\
Name,Email
Adam Adams,adam@example.com
Taylor Wall,taylor@example.com
Jason Torres,jason@example.com
Cassandra Weber,cassandra@example.com
Carl Mclaughlin,carl@example.com
Gabriel Lee,gabriel@example.com
";

/// Run a CLI command against `home` and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_with_env(home, &[], args)
}

/// Like `run_cli`, with extra environment variables set.
fn run_cli_with_env(home: &Path, envs: &[(&str, &str)], args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_labsched"))
        .args(args)
        .env("LABSCHED_HOME", home)
        .env_remove("LABSCHED_STORE")
        .env_remove("LABSCHED_SMTP_USER")
        .env_remove("LABSCHED_SMTP_PASSWORD")
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn setup() -> (TempDir, String) {
    let home = TempDir::new().unwrap();
    let roster = home.path().join("students.csv");
    std::fs::write(&roster, ROSTER).unwrap();
    let roster = roster.to_string_lossy().to_string();
    (home, roster)
}

#[test]
fn test_schedule_report() {
    let (home, roster) = setup();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["--course", "MCT543", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t", "00:30:00"],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(stdout.contains("MCT543"));
    assert!(stdout.contains("SESSION NUMBER: 0"));
    assert!(stdout.contains("SESSION NUMBER: 1"));
    assert!(stdout.contains("TIME: 12:30:00 - 13:00:00"));
}

#[test]
fn test_schedule_json_with_groups() {
    let (home, roster) = setup();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &[
            "schedule", "-f", &roster, "-s", "10:00:00", "-e", "11:00:00", "-t", "00:30:00", "-n", "2",
            "--seed", "7", "--json",
        ],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");

    let bundle: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sessions = bundle["schedule"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    // ceil(6/2) = 3, rounded down to 2 for the first session
    assert_eq!(sessions[0]["groups"].as_object().unwrap().len(), 1);
    assert_eq!(sessions[1]["groups"].as_object().unwrap().len(), 2);
    assert_eq!(bundle["per_group"], "2");
}

#[test]
fn test_seeded_runs_match() {
    let (home, roster) = setup();
    let args = [
        "schedule", "-f", roster.as_str(), "-s", "9:00:00", "-e", "10:00:00", "-t", "0:20:00", "--seed", "99", "--json",
    ];
    let (_, first, _) = run_cli(home.path(), &args);
    let (_, second, _) = run_cli(home.path(), &args);
    assert_eq!(first, second);
}

#[test]
fn test_malformed_time_fails() {
    let (home, roster) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t", "30:00"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("30:00"));
}

#[test]
fn test_save_retrieve_delete() {
    let (home, roster) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "--save", "--course", "MCT543", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t",
            "00:30:00",
        ],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(stderr.contains("saved with id 1"));

    let (code, stdout, _) = run_cli(home.path(), &["db", "--retrieve", "course", "MCT543", "--json"]);
    assert_eq!(code, 0);
    let bundles: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(bundles.as_array().unwrap().len(), 1);
    assert_eq!(bundles[0]["id"], "1");

    let (code, _, stderr) = run_cli(home.path(), &["dbaccess", "--del", "id", "1"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("deleted 1 schedule(s)"));

    let (_, stdout, _) = run_cli(home.path(), &["db", "-r", "course", "MCT543", "--json"]);
    let bundles: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(bundles.as_array().unwrap().is_empty());
}

#[test]
fn test_email_writes_outbox() {
    let (home, roster) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["--email", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t", "00:30:00"],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(stderr.contains("notified 6 participant(s), 0 failed"));
    assert_eq!(std::fs::read_dir(home.path().join("outbox")).unwrap().count(), 6);
}

#[test]
fn test_config_get_set() {
    let (home, _) = setup();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "notify.subject"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "LAB SCHEDULE");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "notify.signature", "Lab Office"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "notify.signature"]);
    assert_eq!(stdout.trim(), "Lab Office");

    let (code, _, _) = run_cli(home.path(), &["config", "get", "nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_retrieve_email_uses_stored_roster() {
    let (home, roster) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "--save", "--course", "MCT543", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t",
            "00:30:00",
        ],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(!home.path().join("outbox").exists());

    let (code, _, stderr) = run_cli(home.path(), &["--email", "db", "--retrieve", "course", "MCT543"]);
    assert_eq!(code, 0, "retrieve failed: {stderr}");
    assert!(stderr.contains("notified 6 participant(s), 0 failed"));
    assert_eq!(std::fs::read_dir(home.path().join("outbox")).unwrap().count(), 6);
}

#[test]
fn test_retrieve_email_without_roster_file_skips() {
    let (home, _) = setup();
    let store = serde_json::json!({
        "next_id": 1,
        "bundles": [{
            "schedule": [{
                "session_number": 0,
                "start_time": "12:00:00",
                "end_time": "13:00:00",
                "groups": ["Adam Adams"]
            }],
            "course": "MCT501",
            "id": "1"
        }]
    });
    std::fs::write(home.path().join("schedules.json"), store.to_string()).unwrap();

    let (code, stdout, stderr) = run_cli(home.path(), &["--email", "db", "-r", "course", "MCT501"]);
    assert_eq!(code, 0, "retrieve failed: {stderr}");
    assert!(stdout.contains("ADAM ADAMS"));
    assert!(stderr.contains("schedule 1 has no roster file recorded"));
    assert!(!stderr.contains("notified"));
}

#[test]
fn test_store_env_override() {
    let (home, roster) = setup();
    let custom = home.path().join("elsewhere").join("custom.json");
    let custom_str = custom.to_string_lossy().to_string();
    let envs = [("LABSCHED_STORE", custom_str.as_str())];

    let (code, _, stderr) = run_cli_with_env(
        home.path(),
        &envs,
        &["--save", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t", "00:30:00"],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(custom.exists());
    assert!(!home.path().join("schedules.json").exists());

    let (_, stdout, _) = run_cli_with_env(home.path(), &envs, &["config", "paths"]);
    assert!(stdout.contains(&format!("store: {custom_str}")));

    let (_, stdout, _) = run_cli_with_env(home.path(), &envs, &["db", "-r", "id", "1", "--json"]);
    let bundles: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(bundles.as_array().unwrap().len(), 1);
}

#[test]
fn test_email_to_stdout() {
    let (home, roster) = setup();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &[
            "--email", "--delivery", "stdout", "--subject", "PHYSICS LAB", "schedule", "-f", &roster, "-s",
            "12:00:00", "-e", "13:00:00", "-t", "00:30:00",
        ],
    );
    assert_eq!(code, 0, "schedule failed: {stderr}");
    assert!(stderr.contains("notified 6 participant(s), 0 failed"));
    assert!(stdout.contains("To: adam@example.com"));
    assert!(stdout.contains("Subject: PHYSICS LAB"));
    assert_eq!(stdout.matches("Subject: ").count(), 6);
    assert!(!home.path().join("outbox").exists());
}

#[test]
fn test_email_over_smtp_requires_sender() {
    let (home, roster) = setup();
    let (code, _, stderr) = run_cli(
        home.path(),
        &[
            "--email", "--delivery", "smtp", "schedule", "-f", &roster, "-s", "12:00:00", "-e", "13:00:00", "-t",
            "00:30:00",
        ],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("no sender address"), "unexpected stderr: {stderr}");
}

#[test]
fn test_config_paths() {
    let (home, _) = setup();
    let (code, stdout, _) = run_cli(home.path(), &["config", "paths"]);
    assert_eq!(code, 0);
    let store = home.path().join("schedules.json");
    let outbox = home.path().join("outbox");
    assert!(stdout.contains(&format!("store: {}", store.display())));
    assert!(stdout.contains(&format!("outbox: {}", outbox.display())));
}

#[test]
fn test_config_reset() {
    let (home, _) = setup();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "notify.signature", "Lab Office"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("config reset to defaults"));

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "notify.signature"]);
    assert_eq!(stdout.trim(), "Management");
}

#[test]
fn test_config_get_unset_value() {
    let (home, _) = setup();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "notify.sender"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "");
}
