pub mod loading;
pub mod notifications;

pub use loading::{LoadingGuard, LoadingIndicator};
pub use notifications::{
    Notification, NotificationCenter, NotificationLevel, Notifier,
};
