//! Transient user notifications (toasts)

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Sending half, cloned into every view that reports outcomes
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half, drained by whatever renders the toasts
pub struct NotificationFeed {
    rx: mpsc::UnboundedReceiver<Notification>,
}

/// Create a connected notifier and feed
pub fn channel() -> (Notifier, NotificationFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NotificationFeed { rx })
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message.into());
    }

    fn push(&self, level: NotificationLevel, message: String) {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message,
            created_at: Utc::now(),
        };
        // Nobody listening is not an error: the toast simply goes unseen
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped, no feed attached");
        }
    }
}

impl NotificationFeed {
    /// Take every notification queued so far
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(notification) = self.rx.try_recv() {
            out.push(notification);
        }
        out
    }

    /// Wait for the next notification
    pub async fn next(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }
}
