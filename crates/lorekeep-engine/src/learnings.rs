use lorekeep_types::NO_LEARNINGS_SENTINEL;

/// Clean up raw generator output before it is scanned and persisted.
///
/// Trims surrounding whitespace and unwraps a response that was wrapped in a
/// single fenced code block.
pub fn normalize_learnings(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix("```")
        && let Some(inner) = rest.strip_suffix("```")
    {
        // Drop the info string (```markdown) on the opening fence line.
        let body = match inner.split_once('\n') {
            Some((_, body)) => body,
            None => inner,
        };
        return body.trim().to_string();
    }

    trimmed.to_string()
}

/// True when `body` is empty or just says there is nothing new.
///
/// Case, surrounding emphasis/bullet markers, a trailing period, and whether
/// words are joined by spaces, `-` or `_` are all ignored, so
/// "**No new learnings.**" counts as the sentinel.
pub fn is_no_learnings(body: &str) -> bool {
    let core = body.trim().trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '*' | '_' | '`' | '.' | '-' | '"' | '\'')
    });
    if core.is_empty() {
        return true;
    }

    let canonical: String = core
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_");

    canonical == NO_LEARNINGS_SENTINEL
}
