//! Side effects the front end must carry out on behalf of the controller.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

use crate::OperationType;

/// A control the controller may disable while work is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// The "delete selected" trigger.
    DeleteSelected,
}

/// A request from the controller to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Enable or disable a control.
    ControlEnabled { control: ControlId, enabled: bool },
    /// Reload the current listing after a delay.
    RefreshScheduled { after: Duration },
    /// Navigate to another location after a delay.
    NavigateScheduled { to: String, after: Duration },
    /// A batch finished.
    BatchFinished {
        operation: OperationType,
        succeeded: usize,
        failed: usize,
    },
    /// A download was written to disk.
    DownloadSaved { path: PathBuf },
}

/// Sending half of the controller event channel.
///
/// Sending never blocks; events for a closed receiver are dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<ControllerEvent>>,
}

impl EventSink {
    /// Create a sink and the receiver the host drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards every event.
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ControllerEvent) {
        trace!(?event, "Controller event");
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Keeps a control disabled until dropped.
#[must_use = "the control is re-enabled as soon as the guard is dropped"]
pub(crate) struct ControlGuard {
    sink: EventSink,
    control: ControlId,
}

impl ControlGuard {
    pub(crate) fn disable(sink: &EventSink, control: ControlId) -> Self {
        sink.emit(ControllerEvent::ControlEnabled {
            control,
            enabled: false,
        });
        Self {
            sink: sink.clone(),
            control,
        }
    }
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        self.sink.emit(ControllerEvent::ControlEnabled {
            control: self.control,
            enabled: true,
        });
    }
}
