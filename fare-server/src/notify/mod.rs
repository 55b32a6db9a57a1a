//! Outbound notifications.
//!
//! Notifications are fire-and-forget: [`Notifier::notify`] returns
//! immediately and delivery failures are logged, never propagated.

mod webhook;

#[cfg(test)]
use std::sync::Mutex;

pub use webhook::{WebhookConfig, WebhookNotifier};

/// Which stream a notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Successful fare searches
    Search,
    /// Failed fare searches
    Error,
    /// Station, fare, and route registrations
    Registration,
}

/// A best-effort notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, channel: Channel, message: String);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _channel: Channel, _message: String) {}
}

/// Keeps notifications in memory, for inspection in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Channel, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, oldest first.
    pub fn sent(&self) -> Vec<(Channel, String)> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, channel: Channel, message: String) {
        match self.sent.lock() {
            Ok(mut sent) => sent.push((channel, message)),
            Err(poisoned) => poisoned.into_inner().push((channel, message)),
        }
    }
}
