use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::stage::{InstallReport, Stage};

/// Progress notifications for whatever presentation layer drives the run.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InstallEvent {
    StageChanged {
        stage: Stage,
    },
    /// Sent before an entry of a batch is attempted.
    ItemStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// Sent after an entry of a batch completed (downloaded or skipped).
    ItemProgress {
        completed: usize,
        total: usize,
    },
    BytesProgress {
        name: String,
        received: u64,
        total: Option<u64>,
    },
    Alert {
        level: AlertLevel,
        key: String,
    },
    Finished {
        report: InstallReport,
    },
    Failed {
        stage: Stage,
        message: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertLevel {
    Info,
    Warning,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: InstallEvent);
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: InstallEvent) {}
}

impl EventSink for UnboundedSender<InstallEvent> {
    fn emit(&self, event: InstallEvent) {
        // A dropped receiver only means nobody is watching anymore.
        if self.send(event).is_err() {
            debug!("Install event receiver closed");
        }
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(InstallEvent) + Send + Sync,
{
    fn emit(&self, event: InstallEvent) {
        (self.0)(event)
    }
}
