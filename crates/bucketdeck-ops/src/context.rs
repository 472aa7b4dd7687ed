//! Handles shared by every operation flow.

use std::sync::Arc;
use std::time::Duration;

use bucketdeck_core::TimingConfig;
use bucketdeck_dialog::DialogController;

use crate::{ControllerEvent, EventSink, StatusReporter};

/// The client, dialog, status line and event sink an operation flow needs.
pub struct OperationContext<A> {
    api: Arc<A>,
    dialog: DialogController,
    status: StatusReporter,
    events: EventSink,
    timing: TimingConfig,
}

impl<A> OperationContext<A> {
    pub fn new(
        api: Arc<A>,
        dialog: DialogController,
        status: StatusReporter,
        events: EventSink,
        timing: TimingConfig,
    ) -> Self {
        Self {
            api,
            dialog,
            status,
            events,
            timing,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub(crate) fn schedule_refresh(&self, after: Duration) {
        self.events.emit(ControllerEvent::RefreshScheduled { after });
    }
}

impl<A> Clone for OperationContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            dialog: self.dialog.clone(),
            status: self.status.clone(),
            events: self.events.clone(),
            timing: self.timing.clone(),
        }
    }
}
