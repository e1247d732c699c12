//! Transient user-facing notifications ("toasts"). Keys match the translation keys of the page.

use slog_scope::{debug, error, info};

pub const EXPORT_SUCCESS: &str = "toast.exportSuccess";
pub const EXPORT_ERROR: &str = "toast.exportError";
pub const IMPORT_SUCCESS: &str = "toast.importSuccess";
pub const IMPORT_ERROR_INVALID_FILE: &str = "toast.importErrorInvalidFile";
pub const BING_ERROR: &str = "toast.wallpaper.bingError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub key: &'static str,
}

impl Notification {
    pub const fn success(key: &'static str) -> Self {
        Self {
            level: Level::Success,
            key,
        }
    }

    pub const fn error(key: &'static str) -> Self {
        Self {
            level: Level::Error,
            key,
        }
    }

    /// English text for the notification.
    pub fn message(&self) -> &'static str {
        match self.key {
            EXPORT_SUCCESS => "Settings exported successfully.",
            EXPORT_ERROR => "Failed to export settings.",
            IMPORT_SUCCESS => "Settings imported successfully. Reload to apply them everywhere.",
            IMPORT_ERROR_INVALID_FILE => "Invalid settings file.",
            BING_ERROR => "Failed to load the Bing wallpaper.",
            _ => self.key,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Prints notifications to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => info!("{}", notification.key),
            Level::Error => error!("{}", notification.key),
        }
        eprintln!("{}", notification.message());
    }
}

/// Keeps notifications in memory.
#[derive(Default)]
pub struct RecordingNotifier(parking_lot::Mutex<Vec<Notification>>);

impl RecordingNotifier {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        debug!("Recorded notification {}", notification.key);
        self.0.lock().push(notification);
    }
}
