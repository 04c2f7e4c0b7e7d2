use chrono::{DateTime, Duration, Utc};

use crate::models::{Notification, NotificationLevel};

/// Alerts disappear on their own after this long.
pub const NOTIFICATION_TTL_SECS: i64 = 5;

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(NOTIFICATION_TTL_SECS))
    }
}

impl NotificationCenter {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: String, level: NotificationLevel) -> Notification {
        self.push_at(Utc::now(), message, level)
    }

    pub fn push_at(&mut self, now: DateTime<Utc>, message: String, level: NotificationLevel) -> Notification {
        self.prune(now);
        let notification = Notification {
            message,
            level,
            created_at: now,
            expires_at: now + self.ttl,
        };
        // Newest first, like alerts inserted at the top of the container
        self.items.insert(0, notification.clone());
        notification
    }

    /// Notifications still on screen at `now`.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        self.items
            .iter()
            .filter(|n| n.expires_at > now)
            .cloned()
            .collect()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
