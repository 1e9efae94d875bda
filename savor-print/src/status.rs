//! Print status reporting
//!
//! The facade never draws anything itself; it reports status transitions and
//! user messages through a [`StatusReporter`].

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

/// Printer indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintStatus {
    Online,
    Offline,
    Printing,
    Success,
    Error,
}

impl PrintStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Printer Ready",
            Self::Offline => "Printer Offline",
            Self::Printing => "Printing...",
            Self::Success => "Print Success",
            Self::Error => "Print Error",
        }
    }

    /// Success and Error are transient and fall back to Online
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Sink for status changes and transient user messages
pub trait StatusReporter: Send + Sync + 'static {
    fn set_status(&self, status: PrintStatus);

    /// Show `message` for `duration`
    fn show_message(&self, message: &str, kind: MessageKind, duration: Duration);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl StatusReporter for NoopReporter {
    fn set_status(&self, _status: PrintStatus) {}

    fn show_message(&self, _message: &str, _kind: MessageKind, _duration: Duration) {}
}

/// Something a [`RecordingReporter`] saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Status(PrintStatus),
    Message { text: String, kind: MessageKind },
}

/// Keeps every report in order; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    pub fn statuses(&self) -> Vec<PrintStatus> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Status(s) => Some(*s),
                ReportEvent::Message { .. } => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(String, MessageKind)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Message { text, kind } => Some((text.clone(), *kind)),
                ReportEvent::Status(_) => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<PrintStatus> {
        self.statuses().last().copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusReporter for RecordingReporter {
    fn set_status(&self, status: PrintStatus) {
        self.lock().push(ReportEvent::Status(status));
    }

    fn show_message(&self, message: &str, kind: MessageKind, _duration: Duration) {
        self.lock().push(ReportEvent::Message {
            text: message.to_string(),
            kind,
        });
    }
}

/// Reports to the operator's terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

impl StatusReporter for TerminalReporter {
    fn set_status(&self, status: PrintStatus) {
        tracing::info!(status = ?status, "{}", status.label());
    }

    fn show_message(&self, message: &str, kind: MessageKind, _duration: Duration) {
        match kind {
            MessageKind::Error => tracing::error!("{message}"),
            MessageKind::Success | MessageKind::Info => tracing::info!("{message}"),
        }
        eprintln!("{message}");
    }
}
