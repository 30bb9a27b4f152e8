//! Custom assertions on the CLI's JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert the `outcome` tag of an `extract --format json` document.
pub fn assert_outcome(json: &Value, expected: &str) -> Result<()> {
    let outcome = json["outcome"]
        .as_str()
        .context("Expected 'outcome' string in JSON")?;

    if outcome != expected {
        anyhow::bail!("Expected outcome {}, got {}: {}", expected, outcome, json);
    }

    Ok(())
}

/// Assert the rule labels reported by a `secrets_detected` outcome, in order.
pub fn assert_flagged_rules(json: &Value, expected: &[&str]) -> Result<()> {
    assert_outcome(json, "secrets_detected")?;
    let rules: Vec<&str> = json["rules"]
        .as_array()
        .context("Expected 'rules' array in JSON")?
        .iter()
        .filter_map(Value::as_str)
        .collect();

    if rules != expected {
        anyhow::bail!("Expected rules {:?}, got {:?}", expected, rules);
    }

    Ok(())
}

/// Assert that a `sessions --format json` document lists `expected` sessions.
pub fn assert_session_count(json: &Value, expected: usize) -> Result<()> {
    let sessions = json["sessions"]
        .as_array()
        .context("Expected 'sessions' array in JSON")?;

    if sessions.len() != expected {
        anyhow::bail!("Expected {} sessions, got {}", expected, sessions.len());
    }

    Ok(())
}
