/// Notification surface
///
/// A stack of one: showing a toast replaces whatever is on screen. Each toast
/// has an id so that timers started for a replaced toast become no-ops.
use std::time::Duration;

use tracing::debug;

/// How long a toast stays fully visible
pub const DISPLAY_DURATION: Duration = Duration::from_secs(4);

/// Length of the exit transition before the toast is removed
pub const EXIT_DURATION: Duration = Duration::from_millis(300);

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Showing,
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub phase: ToastPhase,
}

#[derive(Debug, Default)]
pub struct Notifications {
    current: Option<Toast>,
    next_id: ToastId,
}

impl Notifications {
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Show a toast, replacing any existing one. The caller schedules
    /// [`Notifications::begin_exit`] after [`DISPLAY_DURATION`].
    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            kind,
            message: message.into(),
            phase: ToastPhase::Showing,
        };
        debug!(id = toast.id, ?kind, message = %toast.message, "notification");

        self.current = Some(toast);
        self.next_id
    }

    /// Start the exit transition of toast `id`.
    /// Returns false when that toast is no longer on screen.
    pub fn begin_exit(&mut self, id: ToastId) -> bool {
        match self.current.as_mut() {
            Some(toast) if toast.id == id && toast.phase == ToastPhase::Showing => {
                toast.phase = ToastPhase::Leaving;
                true
            }
            _ => false,
        }
    }

    /// Remove toast `id` if it is still the current one
    pub fn remove(&mut self, id: ToastId) {
        if self.current.as_ref().is_some_and(|toast| toast.id == id) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_toast_replaces_existing() {
        let mut notifications = Notifications::default();
        let first = notifications.show(ToastKind::Info, "first");
        let second = notifications.show(ToastKind::Success, "second");

        assert_ne!(first, second);
        let current = notifications.current().unwrap();
        assert_eq!(current.id, second);
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, ToastKind::Success);
    }

    #[test]
    fn test_stale_timers_are_harmless() {
        let mut notifications = Notifications::default();
        let first = notifications.show(ToastKind::Info, "first");
        let second = notifications.show(ToastKind::Warning, "second");

        // Timers of the replaced toast fire later
        assert!(!notifications.begin_exit(first));
        notifications.remove(first);

        let current = notifications.current().unwrap();
        assert_eq!(current.id, second);
        assert_eq!(current.phase, ToastPhase::Showing);
    }

    #[test]
    fn test_exit_then_remove() {
        let mut notifications = Notifications::default();
        let id = notifications.show(ToastKind::Error, "boom");

        assert!(notifications.begin_exit(id));
        assert_eq!(notifications.current().unwrap().phase, ToastPhase::Leaving);
        // Exit only starts once
        assert!(!notifications.begin_exit(id));

        notifications.remove(id);
        assert!(notifications.current().is_none());

        // Removing an already removed toast is fine
        notifications.remove(id);
    }
}
