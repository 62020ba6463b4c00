//! User-facing notification sink.
//!
//! The HTTP wrapper reports transport and application errors here instead of
//! deciding how they are shown. A terminal prints them, a UI turns them into
//! toasts, tests collect them.

use std::sync::Mutex;

/// Severity of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Receives user-facing notices from the network layer and stores.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Forwards notices to `tracing`. Used when no UI sink is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => tracing::info!(notice = message, "notice"),
            NoticeLevel::Warning => tracing::warn!(notice = message, "notice"),
            NoticeLevel::Error => tracing::error!(notice = message, "notice"),
        }
    }
}

/// Buffers notices until a consumer drains them.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered notice, oldest first.
    pub fn drain(&self) -> Vec<(NoticeLevel, String)> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let mut guard = match self.notices.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((level, message.to_owned()));
    }
}
