use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use lorekeep_providers::{
    Error, FilterWindow, extract_session, extract_sessions, load_session_index, recent_log_paths,
};
use lorekeep_types::{ConversationTurn, Role};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/claude_session.jsonl")
}

fn user_line(text: &str) -> String {
    serde_json::json!({"type": "user", "message": {"role": "user", "content": text}}).to_string()
}

fn assistant_line(text: &str) -> String {
    serde_json::json!({
        "type": "assistant",
        "message": {"role": "assistant", "content": [{"type": "text", "text": text}]}
    })
    .to_string()
}

fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_sample_session_extraction() -> Result<()> {
    let extraction = extract_session(&sample_path())?;

    assert_eq!(
        extraction.turns,
        vec![
            ConversationTurn::user("How do I run the integration tests?"),
            ConversationTurn::assistant(
                "Run `cargo test --workspace`; the CLI tests need the binary built first."
            ),
            ConversationTurn::assistant("All 42 tests pass. Fixtures live under tests/samples."),
            ConversationTurn::user("Thanks, that fixed it."),
        ]
    );
    assert_eq!(extraction.skipped_count(), 2);
    assert_eq!(
        extraction.skipped.iter().map(|s| s.line).collect::<Vec<_>>(),
        vec![3, 6]
    );
    assert!(extraction.missing.is_empty());
    assert_eq!(extraction.sessions_read, 1);
    Ok(())
}

#[test]
fn test_corruption_tolerance_for_any_interleaving() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let valid = [
        user_line("u1"),
        assistant_line("a1"),
        user_line("u2"),
        assistant_line("a2"),
    ];
    let malformed = [
        "{broken".to_string(),
        "[1,2".to_string(),
        r#"{"type":"user"}"#.to_string(),
    ];

    // Slide the malformed block through every position of the valid sequence.
    for insert_at in 0..=valid.len() {
        let mut lines: Vec<String> = valid.to_vec();
        for (offset, bad) in malformed.iter().enumerate() {
            lines.insert(insert_at + offset, bad.clone());
        }
        let path = write_log(temp_dir.path(), &format!("log-{}.jsonl", insert_at), &lines);

        let extraction = extract_session(&path)?;
        let texts: Vec<_> = extraction.turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["u1", "a1", "u2", "a2"], "insert_at={}", insert_at);
        assert_eq!(extraction.skipped_count(), malformed.len());
    }
    Ok(())
}

#[test]
fn test_untyped_records_are_not_counted_as_malformed() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let lines = vec![
        "{}".to_string(),
        user_line("u1"),
        r#"{"leafUuid":"abc","summary":"Refactor"}"#.to_string(),
        assistant_line("a1"),
    ];
    let path = write_log(temp_dir.path(), "untyped.jsonl", &lines);

    let extraction = extract_session(&path)?;
    assert_eq!(extraction.turns.len(), 2);
    assert_eq!(extraction.skipped_count(), 0);
    Ok(())
}

#[test]
fn test_non_text_payloads_never_become_turns() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let lines = vec![
        serde_json::json!({
            "type": "user",
            "message": {"content": [{"type": "tool_result", "tool_use_id": "t", "content": "done"}]}
        })
        .to_string(),
        serde_json::json!({
            "type": "user",
            "message": {"content": {"unexpected": "object"}}
        })
        .to_string(),
        serde_json::json!({
            "type": "assistant",
            "message": {"content": [
                {"type": "tool_use", "id": "t", "name": "Read", "input": {"file_path": "a.rs"}},
                {"type": "image", "source": {}}
            ]}
        })
        .to_string(),
    ];
    let path = write_log(temp_dir.path(), "tools.jsonl", &lines);

    let extraction = extract_session(&path)?;
    assert!(extraction.is_empty());
    assert_eq!(extraction.skipped_count(), 0);
    Ok(())
}

#[test]
fn test_sessions_concatenate_in_given_order_and_skip_missing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first = write_log(temp_dir.path(), "first.jsonl", &[user_line("one")]);
    let second = write_log(
        temp_dir.path(),
        "second.jsonl",
        &[assistant_line("two"), user_line("three")],
    );
    let gone = temp_dir.path().join("gone.jsonl");

    let extraction = extract_sessions(&[second.clone(), gone.clone(), first.clone()])?;
    let texts: Vec<_> = extraction.turns.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["two", "three", "one"]);
    assert_eq!(extraction.missing, vec![gone]);
    assert_eq!(extraction.sessions_read, 2);
    Ok(())
}

#[test]
fn test_load_index_accepts_wrapped_and_bare_documents() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let entry = serde_json::json!({
        "sessionId": "s1",
        "fullPath": "/logs/s1.jsonl",
        "fileMtime": 1_760_000_000_000_i64,
        "projectPath": "/work/app"
    });

    let wrapped = temp_dir.path().join("wrapped.json");
    fs::write(
        &wrapped,
        serde_json::json!({"version": 1, "entries": [entry.clone()]}).to_string(),
    )?;
    let bare = temp_dir.path().join("bare.json");
    fs::write(&bare, serde_json::json!([entry]).to_string())?;

    assert_eq!(load_session_index(&wrapped)?, load_session_index(&bare)?);
    assert_eq!(load_session_index(&wrapped)?.len(), 1);
    Ok(())
}

#[test]
fn test_load_index_drops_unreadable_entries() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("sessions-index.json");
    fs::write(
        &path,
        serde_json::json!({"entries": [
            {"sessionId": "ok", "fullPath": "/logs/ok.jsonl", "fileMtime": 1, "projectPath": "/p"},
            {"sessionId": "no-path", "fileMtime": 2},
            "garbage"
        ]})
        .to_string(),
    )?;

    let index = load_session_index(&path)?;
    assert_eq!(index.len(), 1);
    assert_eq!(index.entries()[0].session_id, "ok");
    Ok(())
}

#[test]
fn test_load_index_rejects_unknown_documents() {
    let temp_dir = TempDir::new().unwrap();

    let not_json = temp_dir.path().join("broken.json");
    fs::write(&not_json, "{ nope").unwrap();
    assert!(matches!(load_session_index(&not_json), Err(Error::Json(_))));

    let wrong_shape = temp_dir.path().join("shape.json");
    fs::write(&wrong_shape, r#"{"sessions": 3}"#).unwrap();
    assert!(matches!(
        load_session_index(&wrong_shape),
        Err(Error::Index { .. })
    ));
}

#[test]
fn test_filter_then_extract_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let now: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();

    let included = temp_dir.path().join("included.jsonl");
    fs::copy(sample_path(), &included)?;
    let in_grace = write_log(temp_dir.path(), "active.jsonl", &[user_line("still typing")]);

    let index_path = temp_dir.path().join("sessions-index.json");
    fs::write(
        &index_path,
        serde_json::json!({"version": 1, "entries": [
            {
                "sessionId": "included",
                "fullPath": included,
                "fileMtime": (now - Duration::hours(2)).timestamp_millis(),
                "projectPath": "/Users/test_user/agent-sample"
            },
            {
                "sessionId": "active",
                "fullPath": in_grace,
                "fileMtime": (now - Duration::seconds(30)).timestamp_millis(),
                "projectPath": "/Users/test_user/agent-sample"
            }
        ]})
        .to_string(),
    )?;

    let index = load_session_index(&index_path)?;
    let paths = recent_log_paths(&index, now, FilterWindow::default());
    assert_eq!(paths, vec![included]);

    let extraction = extract_sessions(&paths)?;
    let roles: Vec<_> = extraction.turns.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::Assistant, Role::User]
    );
    assert_eq!(extraction.skipped_count(), 2);
    Ok(())
}
