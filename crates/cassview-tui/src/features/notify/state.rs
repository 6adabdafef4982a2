//! Transient notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Oldest notifications are dropped beyond this.
pub const MAX_NOTIFICATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    /// `ttl` is the lifetime of notifications pushed without an explicit one.
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            ttl,
        }
    }

    pub fn info(&mut self, title: &str, message: impl Into<String>) {
        self.push(title, message, Severity::Info, self.ttl);
    }

    pub fn warn(&mut self, title: &str, message: impl Into<String>) {
        self.push(title, message, Severity::Warning, self.ttl);
    }

    pub fn error(&mut self, title: &str, message: impl Into<String>) {
        self.push(title, message, Severity::Error, self.ttl);
    }

    pub fn push(
        &mut self,
        title: &str,
        message: impl Into<String>,
        severity: Severity,
        ttl: Duration,
    ) {
        self.push_at(title, message, severity, ttl, Instant::now());
    }

    fn push_at(
        &mut self,
        title: &str,
        message: impl Into<String>,
        severity: Severity,
        ttl: Duration,
        now: Instant,
    ) {
        if self.items.len() == MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            title: title.to_string(),
            message: message.into(),
            severity,
            expires_at: now + ttl,
        });
    }

    /// Drops notifications that expired at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|item| item.expires_at > now);
    }

    /// The most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_wins_and_capacity_is_bounded() {
        let mut notes = Notifications::new(Duration::from_secs(4));
        for i in 0..5 {
            notes.info("Refresh", format!("note {i}"));
        }
        assert_eq!(notes.len(), MAX_NOTIFICATIONS);
        assert_eq!(notes.latest().unwrap().message, "note 4");
    }

    #[test]
    fn test_prune_drops_expired() {
        let now = Instant::now();
        let mut notes = Notifications::new(Duration::from_secs(4));
        notes.push_at("A", "short", Severity::Info, Duration::from_secs(1), now);
        notes.push_at("B", "long", Severity::Error, Duration::from_secs(10), now);

        notes.prune(now + Duration::from_secs(2));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.latest().unwrap().severity, Severity::Error);

        notes.prune(now + Duration::from_secs(10));
        assert!(notes.is_empty());
    }
}
