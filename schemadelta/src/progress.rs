//! Advisory progress notifications.
//!
//! The builder and the loaders announce which category they are working on.
//! Notifications are for display only: their order roughly follows the phase
//! order and must not be used for synchronisation.

use tokio::sync::mpsc::UnboundedSender;

use crate::types::Side;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Side the update concerns, when it concerns only one
    pub side: Option<Side>,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            side: None,
            message: message.into(),
        }
    }

    pub fn for_side(side: Side, message: impl Into<String>) -> Self {
        Self {
            side: Some(side),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Some(side) => write!(f, "[{side}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Receiver of progress updates.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

impl ProgressReporter for UnboundedSender<ProgressUpdate> {
    fn report(&self, update: ProgressUpdate) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(update);
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_reporter_receives_updates() {
        let seen = Mutex::new(Vec::new());
        let reporter = |update: ProgressUpdate| seen.lock().unwrap().push(update.to_string());
        reporter.report(ProgressUpdate::new("Comparing tables"));
        reporter.report(ProgressUpdate::for_side(Side::Two, "Loaded views"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["Comparing tables".to_string(), "[database 2] Loaded views".to_string()]
        );
    }

    #[test]
    fn test_channel_reporter_survives_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.report(ProgressUpdate::new("ignored"));
    }
}
