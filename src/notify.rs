//! User-facing failure notifications.
//!
//! The pipeline reports every failed call exactly once through a
//! [`Notifier`]. Presentation clients decide how that looks.

use tracing::warn;

pub trait Notifier: Send + Sync {
    /// Show `message` to the user as an error.
    fn error(&self, message: &str);
}

/// Notifier for headless use: failures go to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(message, "request failed");
    }
}
