//! `lorekeep sessions` and `lorekeep transcript`: the read-only stages.
#![cfg(unix)]

use lorekeep_testing::{SessionLogBuilder, TestWorld, assertions};

fn world_with_three_sessions() -> TestWorld {
    let world = TestWorld::new();
    let mut sessions = world.project_sessions().unwrap();
    sessions
        .add_session(
            &SessionLogBuilder::new()
                .user("Where do fixtures live?")
                .assistant("Under tests/samples."),
            world.minutes_ago(90),
        )
        .unwrap();
    sessions
        .add_session(
            &SessionLogBuilder::new().user("old question"),
            world.minutes_ago(60 * 24),
        )
        .unwrap();
    sessions
        .add_session(
            &SessionLogBuilder::new().user("typing right now"),
            chrono::Utc::now(),
        )
        .unwrap();
    sessions.write_index().unwrap();
    world
}

#[test]
fn test_sessions_lists_only_recent_idle() {
    let world = world_with_three_sessions();

    let result = world.run(&["--format", "json", "sessions"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().unwrap();
    assertions::assert_session_count(&json, 1).unwrap();
    assert_eq!(json["indexed"], 3);
    assert_eq!(json["sessions"][0]["status"], "recent");
}

#[test]
fn test_sessions_all_shows_every_status() {
    let world = world_with_three_sessions();

    let result = world.run(&["--format", "json", "sessions", "--all"]).unwrap();
    let json = result.json().unwrap();
    assertions::assert_session_count(&json, 3).unwrap();
    let statuses: Vec<&str> = json["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["recent", "old", "active"]);
}

#[test]
fn test_sessions_plain_output() {
    let world = world_with_three_sessions();

    let result = world.run(&["sessions"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().contains("(1 of 3 indexed sessions shown)"));
    assert!(result.stdout().contains("1h 30m ago"));
}

#[test]
fn test_sessions_without_session_directory() {
    let world = TestWorld::new();

    let result = world.run(&["sessions"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().starts_with("locate:"));
}

#[test]
fn test_transcript_prints_recent_conversation_only() {
    let world = world_with_three_sessions();

    let result = world.run(&["transcript"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(
        result.stdout(),
        "User: Where do fixtures live?\n\nAssistant: Under tests/samples.\n"
    );
}

#[test]
fn test_transcript_budget_from_config() {
    let world = world_with_three_sessions().with_config("max_transcript_chars = 40");

    let result = world.run(&["--format", "json", "transcript"]).unwrap();
    let json = result.json().unwrap();
    assert_eq!(json["turns_included"], 1);
    assert_eq!(json["turns_omitted"], 1);
    assert_eq!(
        json["text"],
        "[1 earlier turns omitted]\n\nAssistant: Under tests/samples."
    );
}

#[test]
fn test_invalid_config_is_an_error() {
    let world = TestWorld::new().with_config("[window]\nrecency_secs = \"soon\"");

    let result = world.run(&["sessions"]).unwrap();
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("Failed to load config"));
}
