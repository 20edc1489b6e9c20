// Toast notifications - transient, auto-discarded messages for the user

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::workflow::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            severity,
            issued_at: Utc::now(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Destructive)
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

/// In-memory toast queue. Entries expire after the display duration and only
/// the newest `limit` entries are visible at once.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Cache<Uuid, Notification>,
    limit: usize,
}

impl ToastQueue {
    pub fn new(display_for: Duration, limit: usize) -> Self {
        let toasts = Cache::builder()
            .max_capacity(256)
            .time_to_live(display_for)
            .build();

        Self {
            toasts,
            limit: limit.max(1),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(Duration::from_secs(config.display_seconds), config.limit)
    }

    /// Visible toasts, newest first
    pub fn visible(&self) -> Vec<Notification> {
        let mut toasts: Vec<Notification> = self.toasts.iter().map(|(_, toast)| toast).collect();
        toasts.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        toasts.truncate(self.limit);
        toasts
    }

    /// Whether a toast is still live (neither expired nor dismissed)
    pub fn contains(&self, id: &Uuid) -> bool {
        self.toasts.get(id).is_some()
    }

    pub fn dismiss(&self, id: &Uuid) {
        self.toasts.invalidate(id);
    }

    /// Remove and return the visible toasts, newest first. Toasts beyond
    /// `limit` were never visible and are discarded with the rest.
    pub fn drain(&self) -> Vec<Notification> {
        let visible = self.visible();
        self.toasts.invalidate_all();
        visible
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => warn!(
                title = %notification.title,
                description = %notification.description,
                "Destructive notification"
            ),
            Severity::Default => info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
        }
        self.toasts.insert(notification.id, notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_respects_limit_and_order() {
        let queue = ToastQueue::new(Duration::from_secs(60), 2);

        let mut first = Notification::destructive("Error", "first");
        first.issued_at = Utc::now() - chrono::Duration::seconds(10);
        let mut second = Notification::destructive("Error", "second");
        second.issued_at = Utc::now() - chrono::Duration::seconds(5);
        let third = Notification::new("Info", "third", Severity::Default);

        queue.notify(first);
        queue.notify(second);
        queue.notify(third);

        let visible = queue.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].description, "third");
        assert_eq!(visible[1].description, "second");
    }

    #[test]
    fn test_zero_limit_still_shows_one() {
        let queue = ToastQueue::new(Duration::from_secs(60), 0);
        queue.notify(Notification::destructive("Error", "only"));
        assert_eq!(queue.visible().len(), 1);
    }

    #[test]
    fn test_dismiss_removes_toast() {
        let queue = ToastQueue::new(Duration::from_secs(60), 1);
        let toast = Notification::destructive("Error", "dismiss me");
        let id = toast.id;

        queue.notify(toast);
        assert!(queue.contains(&id));

        queue.dismiss(&id);
        assert!(!queue.contains(&id));
    }

    #[test]
    fn test_toasts_expire() {
        let queue = ToastQueue::new(Duration::from_millis(50), 1);
        let toast = Notification::destructive("Error", "short lived");
        let id = toast.id;

        queue.notify(toast);
        assert!(queue.contains(&id));

        std::thread::sleep(Duration::from_millis(150));
        assert!(!queue.contains(&id));
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = ToastQueue::new(Duration::from_secs(60), 1);
        let toast = Notification::destructive("Error", "drained");
        let id = toast.id;
        queue.notify(toast);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(drained[0].is_destructive());
        assert!(!queue.contains(&id));
    }

    #[test]
    fn test_drain_discards_toasts_beyond_limit() {
        let queue = ToastQueue::new(Duration::from_secs(60), 1);
        let mut first = Notification::destructive("Error", "first");
        first.issued_at = Utc::now() - chrono::Duration::seconds(5);
        let first_id = first.id;
        queue.notify(first);
        queue.notify(Notification::destructive("Error", "second"));

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].description, "second");
        assert!(!queue.contains(&first_id));
        assert!(queue.visible().is_empty());
    }
}
