//! Client-side services shared by every view

pub mod cache;
pub mod notifications;
pub mod session;

pub use cache::{QueryCache, QueryKey};
pub use notifications::{Notification, NotificationFeed, NotificationLevel, Notifier};
pub use session::Session;
