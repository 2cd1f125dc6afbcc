// src/notify.rs

//! User-facing notifications emitted by the dashboard.

use std::fmt;

/// Message shown when loading fails.
pub const RETRY_LATER: &str = "Please try again later";

/// A notification for whatever sink the embedding application provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Contests loaded successfully
    Loaded { count: usize },
    /// Loading failed; the contest list was cleared
    Failed { message: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Loaded { count } => {
                write!(f, "Contests loaded: found {count} upcoming contests")
            }
            Notification::Failed { message } => write!(f, "Error loading contests: {message}"),
        }
    }
}

/// Sink for dashboard notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Notifier writing to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::Loaded { .. } => log::info!("{}", notification),
            Notification::Failed { .. } => log::error!("{}", notification),
        }
    }
}
