//! Notification feature slice (toast-style messages on one line).

mod render;
mod state;

pub use render::render_notification;
pub use state::{MAX_NOTIFICATIONS, Notification, Notifications, Severity};
