//! User-facing notifications.
//!
//! Notifications are a side channel: the session keeps working whether or
//! not anyone drains the receiver.

use tokio::sync::mpsc;

use crate::core::DomainError;

/// Sending half held by the session and its detached tasks
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

/// Receiving half handed to the front end
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// How a front end should present a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of a user action
    Success,
    /// Neutral information
    Info,
    /// Something failed
    Error,
}

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A pending calculation failed and the calculator was reset
    InvalidCalculation,
    /// A scientific function was used outside its domain
    Domain(DomainError),
    /// Display copied to the clipboard
    Copied,
    /// Clipboard write failed
    CopyFailed,
    /// History was cleared
    HistoryCleared,
    /// A remote write or fetch failed; in-memory state is unaffected
    PersistenceFailed(String),
    /// Stored preferences could not be loaded; defaults are in use
    PreferencesUnavailable(String),
    /// Theme switched
    ThemeChanged {
        /// Dark mode after the switch
        dark_mode: bool,
    },
}

impl Notification {
    /// Text shown to the user
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidCalculation => "Invalid calculation".into(),
            Self::Domain(err) => err.to_string(),
            Self::Copied => "Copied to clipboard".into(),
            Self::CopyFailed => "Failed to copy to clipboard".into(),
            Self::HistoryCleared => "History cleared".into(),
            Self::PersistenceFailed(_) => "Failed to save calculation history".into(),
            Self::PreferencesUnavailable(_) => "Failed to load preferences".into(),
            Self::ThemeChanged { dark_mode: true } => "Dark mode activated".into(),
            Self::ThemeChanged { dark_mode: false } => "Light mode activated".into(),
        }
    }

    /// Presentation severity
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Copied | Self::HistoryCleared => Severity::Success,
            Self::ThemeChanged { .. } => Severity::Info,
            Self::InvalidCalculation
            | Self::Domain(_)
            | Self::CopyFailed
            | Self::PersistenceFailed(_)
            | Self::PreferencesUnavailable(_) => Severity::Error,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Creates a notification channel
#[must_use]
pub fn channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

/// Drains every notification currently queued
pub fn drain(receiver: &mut NotificationReceiver) -> Vec<Notification> {
    let mut drained = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        drained.push(notification);
    }
    drained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Notification::InvalidCalculation.message(), "Invalid calculation");
        assert_eq!(
            Notification::Domain(DomainError::NegativeSquareRoot).to_string(),
            "Cannot calculate square root of negative number"
        );
        assert_eq!(Notification::Copied.message(), "Copied to clipboard");
        assert_eq!(
            Notification::ThemeChanged { dark_mode: true }.message(),
            "Dark mode activated"
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(Notification::HistoryCleared.severity(), Severity::Success);
        assert_eq!(
            Notification::PersistenceFailed("down".into()).severity(),
            Severity::Error
        );
        assert_eq!(
            Notification::ThemeChanged { dark_mode: false }.severity(),
            Severity::Info
        );
    }

    #[test]
    fn test_drain_collects_in_order() {
        let (tx, mut rx) = channel();
        tx.send(Notification::Copied).unwrap();
        tx.send(Notification::HistoryCleared).unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![Notification::Copied, Notification::HistoryCleared]
        );
        assert!(drain(&mut rx).is_empty());
    }
}
