//! User-facing notices.

use tracing::warn;

/// Receives short, non-blocking messages meant for the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notices to the log at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(notice = message, "{}", message);
    }
}
