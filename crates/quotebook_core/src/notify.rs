//! Transient user notifications.
//!
//! # Responsibility
//! - Carry success and failure messages from any task to the view layer.
//!
//! # Invariants
//! - Sending never blocks and never fails the caller, even after the
//!   inbox is dropped.
//! - Every notification expires after its `ttl`.

use log::debug;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Default display lifetime of a notification.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// One auto-dismissing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Lets a view dismiss one specific message.
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Instant::now(),
            ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

/// Cloneable sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<Notification>,
}

/// Receiving half, owned by the view layer.
#[derive(Debug)]
pub struct NotificationInbox {
    rx: UnboundedReceiver<Notification>,
}

impl Notifier {
    pub fn channel() -> (Notifier, NotificationInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx }, NotificationInbox { rx })
    }

    pub fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            debug!("event=notify module=notify status=dropped reason=inbox_closed");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Notification::info(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Notification::error(message));
    }
}

impl NotificationInbox {
    /// Returns everything queued so far without waiting.
    ///
    /// Notifications whose ttl ran out before they were drained are dropped.
    pub fn drain(&mut self) -> Vec<Notification> {
        let now = Instant::now();
        let mut pending = Vec::new();
        while let Ok(notification) = self.rx.try_recv() {
            if notification.is_expired_at(now) {
                debug!(
                    "event=notify module=notify status=expired id={}",
                    notification.id
                );
                continue;
            }
            pending.push(notification);
        }
        pending
    }
}
