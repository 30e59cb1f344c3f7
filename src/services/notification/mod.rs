//! Toast notifications raised by the mutation engine.
//!
//! Toasts are brief, non-blocking messages such as "Event was created". The
//! engine queues them here; whatever renders the calendar reads the active
//! ones and drops them once they expire.

use std::time::{Duration, Instant};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    /// Plain-text marker used by terminal output.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Info => "i",
            ToastLevel::Warning => "!",
            ToastLevel::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    /// How long to show this toast
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Queue of toasts waiting to be shown or currently on screen.
#[derive(Debug)]
pub struct ToastManager {
    toasts: Vec<Toast>,
    default_duration: Duration,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl ToastManager {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            default_duration,
        }
    }

    /// Add a toast as-is, keeping its own duration.
    pub fn push(&mut self, toast: Toast) {
        log::debug!("Toast [{:?}] {}", toast.level, toast.message);
        self.toasts.push(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::success(message).with_duration(self.default_duration));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::info(message).with_duration(self.default_duration));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::warning(message).with_duration(self.default_duration));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::error(message).with_duration(self.default_duration));
    }

    /// All queued toasts, oldest first.
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    /// Take every queued toast, leaving the manager empty.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Drop toasts whose duration has run out.
    pub fn expire(&mut self) {
        self.expire_at(Instant::now());
    }

    pub fn expire_at(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired_at(now));
    }

    pub fn count(&self, level: ToastLevel) -> usize {
        self.toasts.iter().filter(|t| t.level == level).count()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
