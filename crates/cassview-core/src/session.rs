//! Session records and per-agent aggregates.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::agent::AgentKind;

/// Maximum characters of a session's display name.
pub const DISPLAY_NAME_MAX_CHARS: usize = 60;

/// One session discovered in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Transcript path; unique per session.
    pub source_path: String,
    pub agent: AgentKind,
    /// Project directory the session ran in.
    pub workspace: Option<String>,
    pub title: Option<String>,
    /// `None` when the index had no usable timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Placeholder metric; the index search does not report message counts.
    pub message_count: u32,
}

impl Session {
    /// Seconds elapsed since the session started, or `f64::INFINITY` when unknown.
    pub fn age_seconds(&self) -> f64 {
        self.age_seconds_at(Utc::now())
    }

    /// Same as [`Session::age_seconds`] relative to a fixed `now`.
    pub fn age_seconds_at(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(started) => (now - started).num_milliseconds() as f64 / 1000.0,
            None => f64::INFINITY,
        }
    }

    /// Title, or the transcript file name, capped at [`DISPLAY_NAME_MAX_CHARS`].
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => truncate_chars(title, DISPLAY_NAME_MAX_CHARS),
            _ => truncate_chars(self.file_name(), DISPLAY_NAME_MAX_CHARS),
        }
    }

    /// Last component of `source_path` (empty for an empty path).
    pub fn file_name(&self) -> &str {
        Path::new(&self.source_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }
}

/// Returns the longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Drops every session whose `source_path` was already seen (first wins).
pub fn dedup_by_path(sessions: Vec<Session>) -> Vec<Session> {
    let mut seen = HashSet::new();
    sessions
        .into_iter()
        .filter(|session| seen.insert(session.source_path.clone()))
        .collect()
}

/// Sorts newest first; sessions without a timestamp go last.
///
/// The sort is stable, so equal timestamps keep their index order.
pub fn sort_by_recency(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
}

/// All sessions of one agent, newest first, unique by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSessions {
    agent: AgentKind,
    sessions: Vec<Session>,
}

impl AgentSessions {
    pub fn new(agent: AgentKind, sessions: Vec<Session>) -> Self {
        let mut sessions = dedup_by_path(sessions);
        sort_by_recency(&mut sessions);
        Self { agent, sessions }
    }

    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn session(path: &str, millis: Option<i64>) -> Session {
        Session {
            source_path: path.to_string(),
            agent: AgentKind::Codex,
            workspace: None,
            title: None,
            started_at: millis.and_then(DateTime::from_timestamp_millis),
            message_count: 1,
        }
    }

    #[test]
    fn test_age_is_infinite_without_timestamp() {
        let s = session("/a", None);
        assert!(s.age_seconds().is_infinite());
    }

    #[test]
    fn test_age_relative_to_now() {
        let s = session("/a", Some(0));
        let now = Utc.timestamp_opt(90, 0).unwrap();
        assert_eq!(s.age_seconds_at(now), 90.0);
    }

    #[test]
    fn test_display_name_prefers_title() {
        let mut s = session("/tmp/rollout-1.jsonl", None);
        s.title = Some("Fix the parser".to_string());
        assert_eq!(s.display_name(), "Fix the parser");
    }

    #[test]
    fn test_display_name_falls_back_to_file_name() {
        let mut s = session("/tmp/rollout-1.jsonl", None);
        assert_eq!(s.display_name(), "rollout-1.jsonl");
        s.title = Some(String::new());
        assert_eq!(s.display_name(), "rollout-1.jsonl");
    }

    #[test]
    fn test_display_name_is_capped() {
        let mut s = session("/a", None);
        s.title = Some("é".repeat(200));
        assert_eq!(s.display_name().chars().count(), DISPLAY_NAME_MAX_CHARS);

        let long_name = format!("/tmp/{}.jsonl", "x".repeat(100));
        let s = session(&long_name, None);
        assert_eq!(s.display_name().chars().count(), DISPLAY_NAME_MAX_CHARS);
    }

    #[test]
    fn test_display_name_of_empty_path() {
        let s = session("", None);
        assert_eq!(s.display_name(), "");
    }

    #[test]
    fn test_truncate_chars_keeps_short_input() {
        for text in ["", "abc", &"y".repeat(60)] {
            assert_eq!(truncate_chars(text, 60), text);
        }
        let long = "z".repeat(61);
        let cut = truncate_chars(&long, 60);
        assert_eq!(cut.len(), 60);
        assert!(long.starts_with(cut));
    }

    #[test]
    fn test_sort_puts_unknown_timestamps_last() {
        let mut sessions = vec![
            session("/none", None),
            session("/old", Some(1_000)),
            session("/new", Some(5_000)),
        ];
        sort_by_recency(&mut sessions);
        let paths: Vec<_> = sessions.iter().map(|s| s.source_path.as_str()).collect();
        assert_eq!(paths, ["/new", "/old", "/none"]);
    }

    #[test]
    fn test_aggregate_dedups_first_occurrence() {
        let aggregate = AgentSessions::new(
            AgentKind::Codex,
            vec![
                session("/a", Some(1_000)),
                session("/a", Some(2_000)),
                session("/b", None),
            ],
        );
        assert_eq!(aggregate.count(), 2);
        assert_eq!(aggregate.sessions()[0].source_path, "/a");
        assert_eq!(
            aggregate.sessions()[0].started_at,
            DateTime::from_timestamp_millis(1_000)
        );
        assert_eq!(aggregate.sessions()[1].source_path, "/b");
    }
}
