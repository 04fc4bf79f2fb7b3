//! User-visible notifications raised by the data-access core.

use std::fmt;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Sink for notifications meant for the presentation layer.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Broadcast fan-out to every subscribed presentation component.
///
/// Notifications raised while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        log::debug!(
            "[Notifications] {}: {}",
            notification.level,
            notification.message
        );
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_fans_out_to_subscribers() {
        let center = NotificationCenter::default();
        let mut first = center.subscribe();
        let mut second = center.subscribe();

        center.notify(Notification::error("boom"));

        assert_eq!(first.try_recv().expect("delivered").message, "boom");
        assert_eq!(
            second.try_recv().expect("delivered").level,
            NotificationLevel::Error
        );
    }

    #[test]
    fn notify_without_subscribers_is_harmless() {
        NotificationCenter::new(4).notify(Notification::info("nobody home"));
    }
}
