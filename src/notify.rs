// Notifications - transient user-facing messages
//
// The workflow emits discrete Notification events; the TUI turns them into
// toasts. Errors stay on screen twice as long as everything else.

use std::time::Duration;
use tokio::sync::mpsc;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Default title shown with the message
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        }
    }
}

/// A transient message with a severity and display duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub display_duration: Duration,
}

/// Builds and dispatches notifications
///
/// Sending never fails from the caller's point of view: if the receiving view
/// is gone the notification is dropped and logged at debug level.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
    base_duration: Duration,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>, base_duration: Duration) -> Self {
        Self { tx, base_duration }
    }

    /// Create a notifier together with the receiving end
    pub fn channel(base_duration: Duration) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx, base_duration), rx)
    }

    /// How long a notification of this severity stays visible
    pub fn duration_for(&self, severity: Severity) -> Duration {
        match severity {
            Severity::Error => self.base_duration * 2,
            _ => self.base_duration,
        }
    }

    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            title: severity.title().to_string(),
            message: message.into(),
            severity,
            display_duration: self.duration_for(severity),
        };

        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped: no receiver");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Severity::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_stay_longer() {
        let (notifier, mut rx) = Notifier::channel(Duration::from_millis(3000));
        notifier.success("done");
        notifier.error("broken");

        let ok = rx.try_recv().unwrap();
        let err = rx.try_recv().unwrap();
        assert_eq!(ok.title, "Success");
        assert_eq!(ok.display_duration, Duration::from_millis(3000));
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.display_duration, Duration::from_millis(6000));
    }

    #[test]
    fn test_send_without_receiver_is_silent() {
        let (notifier, rx) = Notifier::channel(Duration::from_secs(1));
        drop(rx);
        notifier.info("nobody listening");
    }
}
