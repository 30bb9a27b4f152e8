use super::Painter;
use chrono::{DateTime, Utc};
use lorekeep_providers::FilterWindow;
use lorekeep_types::SessionIndexEntry;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

/// Where an indexed session sits relative to the time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Inside the window; an extract run reads it
    Recent,
    /// Modified within the grace period, probably still being written
    Active,
    /// Older than the window
    Old,
}

impl SessionStatus {
    pub fn classify(file_mtime_ms: i64, now: DateTime<Utc>, window: FilterWindow) -> Self {
        let (lower, upper) = window.bounds_millis(now);
        if file_mtime_ms >= upper {
            SessionStatus::Active
        } else if file_mtime_ms > lower {
            SessionStatus::Recent
        } else {
            SessionStatus::Old
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SessionStatus::Recent => "recent",
            SessionStatus::Active => "active",
            SessionStatus::Old => "old",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRow {
    pub session_id: String,
    pub full_path: PathBuf,
    pub modified_at: Option<DateTime<Utc>>,
    pub age_secs: i64,
    pub status: SessionStatus,
}

impl SessionRow {
    pub fn new(entry: &SessionIndexEntry, now: DateTime<Utc>, window: FilterWindow) -> Self {
        Self {
            session_id: entry.session_id.clone(),
            full_path: entry.full_path.clone(),
            modified_at: entry.modified_at(),
            age_secs: now.timestamp_millis().saturating_sub(entry.file_mtime) / 1000,
            status: SessionStatus::classify(entry.file_mtime, now, window),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListing {
    pub session_dir: PathBuf,
    pub indexed: usize,
    pub sessions: Vec<SessionRow>,
}

pub fn render_listing(listing: &SessionListing, p: &Painter) -> String {
    let mut out = format!(
        "{} ({} of {} indexed sessions shown)",
        listing.session_dir.display(),
        listing.sessions.len(),
        listing.indexed
    );
    if listing.sessions.is_empty() {
        out.push_str("\nfilter: no recent idle sessions");
        return out;
    }
    for row in &listing.sessions {
        let status = match row.status {
            SessionStatus::Recent => p.ok(row.status.label()),
            SessionStatus::Active => p.warn(row.status.label()),
            SessionStatus::Old => p.dim(row.status.label()),
        };
        let _ = write!(
            out,
            "\n{:<6}  {:>9}  {}  {}",
            status,
            format_age(row.age_secs),
            row.session_id,
            p.dim(&row.full_path.display().to_string())
        );
    }
    out
}

/// Coarse human age: `45s ago`, `12m ago`, `3h 5m ago`, `2d ago`
pub fn format_age(secs: i64) -> String {
    if secs < 0 {
        return "in future".to_string();
    }
    match secs {
        0..60 => format!("{}s ago", secs),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86400 => {
            let minutes = (secs % 3600) / 60;
            if minutes == 0 {
                format!("{}h ago", secs / 3600)
            } else {
                format!("{}h {}m ago", secs / 3600, minutes)
            }
        }
        _ => format!("{}d ago", secs / 86400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn ms_ago(d: Duration) -> i64 {
        (now() - d).timestamp_millis()
    }

    #[test]
    fn test_classify_matches_filter_bounds() {
        let window = FilterWindow::default();
        assert_eq!(
            SessionStatus::classify(ms_ago(Duration::seconds(10)), now(), window),
            SessionStatus::Active
        );
        assert_eq!(
            SessionStatus::classify(ms_ago(Duration::seconds(60)), now(), window),
            SessionStatus::Active
        );
        assert_eq!(
            SessionStatus::classify(ms_ago(Duration::hours(1)), now(), window),
            SessionStatus::Recent
        );
        assert_eq!(
            SessionStatus::classify(ms_ago(Duration::hours(4)), now(), window),
            SessionStatus::Old
        );
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(5), "5s ago");
        assert_eq!(format_age(125), "2m ago");
        assert_eq!(format_age(3 * 3600), "3h ago");
        assert_eq!(format_age(3 * 3600 + 5 * 60), "3h 5m ago");
        assert_eq!(format_age(3 * 86400), "3d ago");
    }

    #[test]
    fn test_extreme_mtimes_do_not_overflow() {
        let entry = |file_mtime| SessionIndexEntry {
            session_id: "s1".to_string(),
            full_path: PathBuf::from("/logs/s1.jsonl"),
            file_mtime,
            project_path: PathBuf::from("/work/app"),
        };
        let window = FilterWindow::default();

        let ancient = SessionRow::new(&entry(i64::MIN), now(), window);
        assert_eq!(ancient.age_secs, i64::MAX / 1000);
        assert_eq!(ancient.status, SessionStatus::Old);

        let future = SessionRow::new(&entry(i64::MAX), now(), window);
        assert!(future.age_secs < 0);
        assert_eq!(future.status, SessionStatus::Active);
        assert_eq!(format_age(future.age_secs), "in future");
    }

    #[test]
    fn test_render_listing() {
        let entry = SessionIndexEntry {
            session_id: "s1".to_string(),
            full_path: PathBuf::from("/logs/s1.jsonl"),
            file_mtime: ms_ago(Duration::minutes(90)),
            project_path: PathBuf::from("/work/app"),
        };
        let listing = SessionListing {
            session_dir: PathBuf::from("/home/u/.claude/projects/-work-app"),
            indexed: 3,
            sessions: vec![SessionRow::new(&entry, now(), FilterWindow::default())],
        };
        insta::assert_snapshot!(render_listing(&listing, &Painter::plain()), @r"
        /home/u/.claude/projects/-work-app (1 of 3 indexed sessions shown)
        recent  1h 30m ago  s1  /logs/s1.jsonl
        ");
    }
}
