//! In-page toast notifications
//!
//! Failed keyboard expansions surface a short-lived message near the page
//! corner. The manager keeps the visible stack; the host renders it and
//! calls [`ToastManager::prune_expired`] on its own timer.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::DEFAULT_TOAST_DURATION_MS;
use crate::error::ErrorSeverity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    Success,
    Warning,
    Error,
    #[default]
    Info,
}

impl ToastVariant {
    pub fn from_severity(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Info => ToastVariant::Info,
            ErrorSeverity::Warning => ToastVariant::Warning,
            ErrorSeverity::Error | ErrorSeverity::Critical => ToastVariant::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    message: String,
    variant: ToastVariant,
    /// Auto-dismiss delay (None = persistent)
    duration_ms: Option<u64>,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Toast {
            message: message.into(),
            variant: ToastVariant::default(),
            duration_ms: Some(DEFAULT_TOAST_DURATION_MS),
        }
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn duration_ms(mut self, duration: Option<u64>) -> Self {
        self.duration_ms = duration;
        self
    }

    pub fn persistent(self) -> Self {
        self.duration_ms(None)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn get_variant(&self) -> ToastVariant {
        self.variant
    }

    pub fn get_duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }
}

#[derive(Debug, Clone)]
struct ActiveToast {
    id: u64,
    toast: Toast,
    shown_at: Instant,
}

impl ActiveToast {
    fn expired(&self, now: Instant) -> bool {
        self.toast
            .duration_ms
            .is_some_and(|ms| now.saturating_duration_since(self.shown_at) >= Duration::from_millis(ms))
    }
}

/// Something that can surface a message to the user
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: ErrorSeverity);
}

/// Visible toasts, oldest first
#[derive(Debug, Default)]
pub struct ToastManager {
    active: Vec<ActiveToast>,
    next_id: u64,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast; returns its id
    pub fn push(&mut self, toast: Toast) -> u64 {
        self.push_at(toast, Instant::now())
    }

    fn push_at(&mut self, toast: Toast, now: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        debug!(id, message = toast.message(), "Toast shown");
        self.active.push(ActiveToast {
            id,
            toast,
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|active| active.id != id);
        self.active.len() != before
    }

    /// Drop toasts whose display time has elapsed; returns how many went
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|active| !active.expired(now));
        before - self.active.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter().map(|active| &active.toast)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Notifier for ToastManager {
    fn notify(&mut self, message: &str, severity: ErrorSeverity) {
        self.push(Toast::new(message).variant(ToastVariant::from_severity(severity)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_defaults_to_short_info() {
        let toast = Toast::new("Saved");
        assert_eq!(toast.get_variant(), ToastVariant::Info);
        assert_eq!(toast.get_duration_ms(), Some(2200));
        assert_eq!(Toast::new("x").persistent().get_duration_ms(), None);
    }

    #[test]
    fn severity_maps_to_variant() {
        assert_eq!(
            ToastVariant::from_severity(ErrorSeverity::Critical),
            ToastVariant::Error
        );
        assert_eq!(
            ToastVariant::from_severity(ErrorSeverity::Warning),
            ToastVariant::Warning
        );
    }

    #[test]
    fn expired_toasts_are_pruned() {
        let mut manager = ToastManager::new();
        let start = Instant::now();
        manager.push_at(Toast::new("short"), start);
        manager.push_at(Toast::new("long").duration_ms(Some(10_000)), start);
        manager.push_at(Toast::new("sticky").persistent(), start);

        assert_eq!(manager.prune_expired(start + Duration::from_millis(100)), 0);
        assert_eq!(manager.prune_expired(start + Duration::from_millis(2200)), 1);
        let left: Vec<_> = manager.visible().map(Toast::message).collect();
        assert_eq!(left, vec!["long", "sticky"]);
    }

    #[test]
    fn notifier_pushes_toast_with_severity_variant() {
        let mut manager = ToastManager::new();
        manager.notify("Click into a text field first.", ErrorSeverity::Warning);
        let toast = manager.visible().next().unwrap();
        assert_eq!(toast.message(), "Click into a text field first.");
        assert_eq!(toast.get_variant(), ToastVariant::Warning);
        assert_eq!(toast.get_duration_ms(), Some(DEFAULT_TOAST_DURATION_MS));
    }

    #[test]
    fn dismiss_by_id() {
        let mut manager = ToastManager::new();
        let first = manager.push(Toast::new("one"));
        let second = manager.push(Toast::new("two"));
        assert_ne!(first, second);
        assert!(manager.dismiss(first));
        assert!(!manager.dismiss(first));
        assert_eq!(manager.len(), 1);
    }
}
