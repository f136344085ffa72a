//! User-facing notifications.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Error,
}

/// Transient, fire-and-forget messages for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notification {
    PromptRequired,
    ContentReady,
    Copied,
    Downloaded,
    Failed,
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Self::PromptRequired | Self::Failed => Severity::Error,
            Self::ContentReady | Self::Copied | Self::Downloaded => Severity::Success,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PromptRequired => "Please enter a prompt to get started!",
            Self::ContentReady => "Your creative content is ready!",
            Self::Copied => "Content copied to clipboard!",
            Self::Downloaded => "Downloaded successfully!",
            Self::Failed => "Something went wrong. Please try again.",
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives notifications. May be called from a reveal task.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity() {
            Severity::Success => tracing::info!(?notification, "{}", notification.message()),
            Severity::Error => tracing::warn!(?notification, "{}", notification.message()),
        }
    }
}
