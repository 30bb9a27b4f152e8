use chrono::{DateTime, Duration, Utc};
use lorekeep_types::{SessionIndex, SessionIndexEntry};
use std::path::PathBuf;

/// Time range, relative to "now", in which a session counts as recent and idle.
///
/// A session qualifies when `now - recency < mtime < now - active_grace`.
/// Both bounds are open: the lower one drops sessions that earlier runs have
/// already covered, the upper one drops logs that may still be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterWindow {
    pub recency: Duration,
    pub active_grace: Duration,
}

impl Default for FilterWindow {
    fn default() -> Self {
        Self {
            recency: Duration::hours(4),
            active_grace: Duration::seconds(60),
        }
    }
}

impl FilterWindow {
    pub fn new(recency: Duration, active_grace: Duration) -> Self {
        Self {
            recency,
            active_grace,
        }
    }

    /// Exclusive `(lower, upper)` bounds in epoch milliseconds
    pub fn bounds_millis(&self, now: DateTime<Utc>) -> (i64, i64) {
        let now_ms = now.timestamp_millis();
        (
            now_ms.saturating_sub(self.recency.num_milliseconds()),
            now_ms.saturating_sub(self.active_grace.num_milliseconds()),
        )
    }

    pub fn contains(&self, file_mtime_ms: i64, now: DateTime<Utc>) -> bool {
        let (lower, upper) = self.bounds_millis(now);
        lower < file_mtime_ms && file_mtime_ms < upper
    }
}

/// Index entries inside the window, in index order.
pub fn select_recent(
    index: &SessionIndex,
    now: DateTime<Utc>,
    window: FilterWindow,
) -> Vec<&SessionIndexEntry> {
    index
        .iter()
        .filter(|entry| window.contains(entry.file_mtime, now))
        .collect()
}

/// Log paths of the entries inside the window, in index order.
pub fn recent_log_paths(
    index: &SessionIndex,
    now: DateTime<Utc>,
    window: FilterWindow,
) -> Vec<PathBuf> {
    select_recent(index, now, window)
        .into_iter()
        .map(|entry| entry.full_path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn entry(id: &str, mtime: DateTime<Utc>) -> SessionIndexEntry {
        SessionIndexEntry {
            session_id: id.to_string(),
            full_path: PathBuf::from(format!("/logs/{}.jsonl", id)),
            file_mtime: mtime.timestamp_millis(),
            project_path: PathBuf::from("/work/app"),
        }
    }

    #[test]
    fn test_grace_boundary_is_open() {
        let window = FilterWindow::default();
        let at_grace = now() - window.active_grace;
        assert!(!window.contains(at_grace.timestamp_millis(), now()));

        let just_before_grace = at_grace - Duration::seconds(1);
        assert!(window.contains(just_before_grace.timestamp_millis(), now()));
    }

    #[test]
    fn test_recency_boundary_is_open() {
        let window = FilterWindow::default();
        let at_limit = now() - window.recency;
        assert!(!window.contains(at_limit.timestamp_millis(), now()));

        let past_limit = at_limit - Duration::seconds(1);
        assert!(!window.contains(past_limit.timestamp_millis(), now()));

        let inside = at_limit + Duration::seconds(1);
        assert!(window.contains(inside.timestamp_millis(), now()));
    }

    #[test]
    fn test_future_mtime_is_excluded() {
        let window = FilterWindow::default();
        let future = now() + Duration::minutes(5);
        assert!(!window.contains(future.timestamp_millis(), now()));
    }

    #[test]
    fn test_select_recent_preserves_index_order() {
        let index = SessionIndex::new(vec![
            entry("late", now() - Duration::minutes(30)),
            entry("stale", now() - Duration::hours(6)),
            entry("active", now() - Duration::seconds(10)),
            entry("early", now() - Duration::hours(3)),
        ]);

        let paths = recent_log_paths(&index, now(), FilterWindow::default());
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/logs/late.jsonl"),
                PathBuf::from("/logs/early.jsonl")
            ]
        );
    }

    #[test]
    fn test_custom_window() {
        let window = FilterWindow::new(Duration::minutes(10), Duration::zero());
        let index = SessionIndex::new(vec![
            entry("a", now() - Duration::minutes(5)),
            entry("b", now() - Duration::minutes(15)),
        ]);

        let ids: Vec<_> = select_recent(&index, now(), window)
            .into_iter()
            .map(|e| e.session_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_empty_index_selects_nothing() {
        let index = SessionIndex::default();
        assert!(recent_log_paths(&index, now(), FilterWindow::default()).is_empty());
    }
}
