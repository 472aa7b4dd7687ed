//! The single user-visible status line.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, trace};

/// Number of past messages kept for [`StatusReporter::history`].
pub const STATUS_HISTORY_LIMIT: usize = 64;

/// Visual level of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Neutral,
    Success,
    Warning,
    Error,
}

/// A message shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub id: u64,
    pub text: String,
    pub level: StatusLevel,
}

/// Identifies one shown message so a delayed hide cannot clear a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusTicket(u64);

struct Shared {
    tx: watch::Sender<Option<StatusMessage>>,
    next_id: AtomicU64,
    history: Mutex<VecDeque<StatusMessage>>,
}

/// Publishes the current status message.
///
/// Cloning is cheap; all clones drive the same status line.
#[derive(Clone)]
pub struct StatusReporter {
    shared: Arc<Shared>,
}

impl StatusReporter {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                tx,
                next_id: AtomicU64::new(1),
                history: Mutex::new(VecDeque::with_capacity(STATUS_HISTORY_LIMIT)),
            }),
        }
    }

    /// Replace the current message.
    pub fn update(&self, text: impl Into<String>, level: StatusLevel) -> StatusTicket {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let message = StatusMessage {
            id,
            text: text.into(),
            level,
        };
        debug!(id, level = ?message.level, text = %message.text, "Status updated");

        if let Ok(mut history) = self.shared.history.lock() {
            if history.len() == STATUS_HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(message.clone());
        }

        self.shared.tx.send_replace(Some(message));
        StatusTicket(id)
    }

    /// Replace the current message and hide it after `delay`.
    pub fn show_transient(
        &self,
        text: impl Into<String>,
        level: StatusLevel,
        delay: Duration,
    ) -> StatusTicket {
        let ticket = self.update(text, level);
        self.hide_later(ticket, delay);
        ticket
    }

    /// Hide the message now if it is still the one being shown.
    pub fn hide(&self, ticket: StatusTicket) -> bool {
        self.shared.tx.send_if_modified(|current| match current {
            Some(message) if message.id == ticket.0 => {
                *current = None;
                true
            }
            _ => false,
        })
    }

    /// Hide the message after `delay` if it is still the one being shown.
    ///
    /// Without a tokio runtime the message simply stays until replaced.
    pub fn hide_later(&self, ticket: StatusTicket, delay: Duration) {
        if delay.is_zero() {
            self.hide(ticket);
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            trace!(?ticket, "No runtime; status will not auto-hide");
            return;
        };

        let reporter = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if reporter.hide(ticket) {
                trace!(?ticket, "Status hidden");
            }
        });
    }

    /// The message currently shown, if any.
    pub fn current(&self) -> Option<StatusMessage> {
        self.shared.tx.borrow().clone()
    }

    /// Recent messages, oldest first.
    pub fn history(&self) -> Vec<StatusMessage> {
        self.shared
            .history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.shared.tx.subscribe()
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("current", &self.current())
            .finish()
    }
}
