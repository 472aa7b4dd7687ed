//! The dialog controller and its session state machine.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};

use crate::event::{DialogEvent, DialogKey, EventDisposition};
use crate::focus::{DialogFocus, FocusHost, Focusable};
use crate::input::InputState;
use crate::options::{ConfirmOptions, DialogKind, DialogOptions, DialogOutcome, PromptOptions};
use crate::DEFAULT_SETTLE_DELAY;

/// Visual state of the dialog layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
    /// Resolved and animating out; becomes `Hidden` after the settle delay.
    Closing,
}

/// Render model of the text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub value: String,
    pub cursor: usize,
    pub selected: bool,
    pub placeholder: String,
}

/// Render model of one dialog session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub session_id: u64,
    pub kind: DialogKind,
    /// `None` when the title is hidden.
    pub title: Option<String>,
    pub message: String,
    pub input: Option<InputView>,
    pub confirm_label: String,
    /// `None` when the cancel button is hidden.
    pub cancel_label: Option<String>,
    pub focus: DialogFocus,
}

/// What a renderer needs to draw the dialog layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub visibility: Visibility,
    /// The open session, or the session animating out while `Closing`.
    pub view: Option<DialogView>,
}

impl DialogSnapshot {
    /// Whether a session is open and awaiting resolution.
    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Visible && self.view.is_some()
    }
}

struct Session {
    id: u64,
    options: DialogOptions,
    input: InputState,
    focus: DialogFocus,
    resolver: oneshot::Sender<DialogOutcome>,
    restore_focus: Option<Weak<dyn Focusable>>,
}

impl Session {
    fn view(&self) -> DialogView {
        let options = &self.options;
        DialogView {
            session_id: self.id,
            kind: options.kind(),
            title: (!options.title.is_empty()).then(|| options.title.clone()),
            message: options.message.clone(),
            input: options.show_input.then(|| InputView {
                value: self.input.value().to_string(),
                cursor: self.input.cursor(),
                selected: self.input.is_selected(),
                placeholder: options.placeholder.clone(),
            }),
            confirm_label: options.confirm_label().to_string(),
            cancel_label: (!options.hide_cancel).then(|| options.cancel_label().to_string()),
            focus: self.focus,
        }
    }

    /// Focusable controls in tab order.
    fn focus_order(&self) -> Vec<DialogFocus> {
        let mut order = Vec::with_capacity(3);
        if self.options.show_input {
            order.push(DialogFocus::Input);
        }
        order.push(DialogFocus::Confirm);
        if !self.options.hide_cancel {
            order.push(DialogFocus::Cancel);
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn handle_key(&mut self, key: DialogKey) -> Step {
        match key {
            DialogKey::Escape => Step::Close(false),
            DialogKey::Enter => {
                if self.options.show_input && self.focus == DialogFocus::Input {
                    Step::Close(true)
                } else {
                    Step::Ignored
                }
            }
            DialogKey::Tab => {
                self.cycle_focus(true);
                Step::Changed
            }
            DialogKey::BackTab => {
                self.cycle_focus(false);
                Step::Changed
            }
            _ if self.focus == DialogFocus::Input => {
                if self.input.apply(key) {
                    Step::Changed
                } else {
                    Step::Ignored
                }
            }
            _ => Step::Ignored,
        }
    }

    fn handle_event(&mut self, event: DialogEvent) -> Step {
        match event {
            DialogEvent::Confirm => Step::Close(true),
            DialogEvent::Cancel if self.options.hide_cancel => Step::Ignored,
            DialogEvent::Cancel => Step::Close(false),
            DialogEvent::Activate => match self.focus {
                DialogFocus::Confirm => Step::Close(true),
                DialogFocus::Cancel => Step::Close(false),
                DialogFocus::Input => Step::Ignored,
            },
            DialogEvent::Pointer(target) => {
                if target.dismisses() {
                    Step::Close(false)
                } else {
                    Step::Ignored
                }
            }
            DialogEvent::Key(key) => self.handle_key(key),
        }
    }
}

enum Step {
    Close(bool),
    Changed,
    Ignored,
}

#[derive(Default)]
struct State {
    session: Option<Session>,
    visibility: Visibility,
    /// View kept while the closed session animates out.
    closing_view: Option<DialogView>,
    next_id: u64,
    /// Bumped on every open and close so stale settle timers do nothing.
    generation: u64,
}

impl State {
    fn snapshot(&self) -> DialogSnapshot {
        let view = match &self.session {
            Some(session) => Some(session.view()),
            None => self.closing_view.clone(),
        };
        DialogSnapshot {
            visibility: self.visibility,
            view,
        }
    }
}

struct Shared {
    state: Mutex<State>,
    snapshot: watch::Sender<DialogSnapshot>,
    focus_host: Option<Arc<dyn FocusHost>>,
    settle_delay: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.snapshot.send_replace(state.snapshot());
    }

    fn finish_close(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation && state.session.is_none() {
            state.visibility = Visibility::Hidden;
            state.closing_view = None;
            self.publish(&state);
        }
    }
}

/// Builder for [`DialogController`].
pub struct DialogControllerBuilder {
    settle_delay: Duration,
    focus_host: Option<Arc<dyn FocusHost>>,
}

impl Default for DialogControllerBuilder {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            focus_host: None,
        }
    }
}

impl DialogControllerBuilder {
    /// Set the delay between closing and hiding the dialog.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the host asked for the focused element when a dialog opens.
    pub fn focus_host(mut self, host: Arc<dyn FocusHost>) -> Self {
        self.focus_host = Some(host);
        self
    }

    pub fn build(self) -> DialogController {
        let (snapshot, _) = watch::channel(DialogSnapshot::default());
        DialogController {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                snapshot,
                focus_host: self.focus_host,
                settle_delay: self.settle_delay,
            }),
        }
    }
}

/// Single-session modal dialog controller.
///
/// Clones share the same session. At most one session is open at a time;
/// opening another while one is pending resolves the new request immediately
/// as not confirmed and leaves the open session untouched.
#[derive(Clone)]
pub struct DialogController {
    shared: Arc<Shared>,
}

impl Default for DialogController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DialogController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogController")
            .field("open", &self.is_open())
            .field("settle_delay", &self.shared.settle_delay)
            .finish()
    }
}

impl DialogController {
    /// Create a controller with default settings and no focus host.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> DialogControllerBuilder {
        DialogControllerBuilder::default()
    }

    /// Open a dialog session.
    ///
    /// The session is registered before this returns, so the dialog is visible
    /// even if the returned future is polled later.
    pub fn open_dialog(&self, options: DialogOptions) -> PendingDialog {
        let mut state = self.shared.lock();

        if let Some(active) = &state.session {
            warn!(
                active_session = active.id,
                title = %options.title,
                "dialog already open, refusing new session"
            );
            return PendingDialog::ready(DialogOutcome::dismissed());
        }

        let restore_focus = self
            .shared
            .focus_host
            .as_ref()
            .and_then(|host| host.active_element())
            .map(|element| Arc::downgrade(&element));

        let (resolver, receiver) = oneshot::channel();
        state.next_id += 1;
        state.generation += 1;

        let focus = if options.show_input {
            DialogFocus::Input
        } else {
            DialogFocus::Confirm
        };
        let input = InputState::with_selected(&options.default_value);
        let id = state.next_id;

        debug!(session = id, kind = ?options.kind(), title = %options.title, "dialog opened");

        state.session = Some(Session {
            id,
            options,
            input,
            focus,
            resolver,
            restore_focus,
        });
        state.visibility = Visibility::Visible;
        state.closing_view = None;
        self.shared.publish(&state);

        PendingDialog::waiting(receiver)
    }

    /// Ask for confirmation. Resolves to whether the user confirmed.
    pub async fn show_confirm(&self, message: impl Into<String>, options: ConfirmOptions) -> bool {
        self.open_dialog(options.into_dialog(message.into()))
            .await
            .confirmed
    }

    /// Ask for a line of text.
    ///
    /// Resolves to the trimmed text, or `None` when the user cancelled or
    /// entered only whitespace.
    pub async fn show_prompt(
        &self,
        message: impl Into<String>,
        options: PromptOptions,
    ) -> Option<String> {
        let outcome = self.open_dialog(options.into_dialog(message.into())).await;
        if !outcome.confirmed {
            return None;
        }
        let value = outcome.value.unwrap_or_default();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Route a user interaction to the open session.
    pub fn handle_event(&self, event: DialogEvent) -> EventDisposition {
        let step = {
            let mut state = self.shared.lock();
            let Some(session) = state.session.as_mut() else {
                return EventDisposition::Ignored;
            };
            let step = session.handle_event(event);
            if matches!(step, Step::Changed) {
                self.shared.publish(&state);
            }
            step
        };

        match step {
            Step::Close(confirmed) => {
                self.close(confirmed);
                EventDisposition::Consumed
            }
            Step::Changed => EventDisposition::Consumed,
            Step::Ignored => EventDisposition::Ignored,
        }
    }

    /// Resolve the open session. Returns `false` if no session was open.
    pub fn close(&self, confirmed: bool) -> bool {
        let (session, generation) = {
            let mut state = self.shared.lock();
            let Some(session) = state.session.take() else {
                return false;
            };
            state.generation += 1;
            state.visibility = Visibility::Closing;
            state.closing_view = Some(session.view());
            self.shared.publish(&state);
            (session, state.generation)
        };

        let value = (confirmed && session.options.show_input)
            .then(|| session.input.value().to_string());

        if let Some(element) = session.restore_focus.as_ref().and_then(Weak::upgrade) {
            element.focus();
        }

        debug!(session = session.id, confirmed, "dialog closed");
        let _ = session.resolver.send(DialogOutcome { confirmed, value });

        self.schedule_hide(generation);
        true
    }

    /// Cancel any open session and hide the dialog immediately.
    ///
    /// Used when the host view goes away while a dialog is pending.
    pub fn teardown(&self) {
        if self.close(false) {
            debug!("dialog torn down with a pending session");
        }
        let generation = self.shared.lock().generation;
        self.shared.finish_close(generation);
    }

    fn schedule_hide(&self, generation: u64) {
        let delay = self.shared.settle_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) if !delay.is_zero() => {
                let shared = Arc::downgrade(&self.shared);
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(shared) = shared.upgrade() {
                        shared.finish_close(generation);
                    }
                });
            }
            _ => self.shared.finish_close(generation),
        }
    }

    /// Whether a session is awaiting resolution.
    pub fn is_open(&self) -> bool {
        self.shared.lock().session.is_some()
    }

    /// The focused dialog control, if a session is open.
    pub fn focus(&self) -> Option<DialogFocus> {
        self.shared.lock().session.as_ref().map(|s| s.focus)
    }

    /// Current render snapshot.
    pub fn snapshot(&self) -> DialogSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Follow render snapshots.
    pub fn subscribe(&self) -> watch::Receiver<DialogSnapshot> {
        self.shared.snapshot.subscribe()
    }
}

/// Future returned by [`DialogController::open_dialog`].
///
/// Resolves to not confirmed if the controller is dropped while pending.
#[must_use = "the dialog outcome is only observable by awaiting"]
pub struct PendingDialog {
    state: PendingState,
}

enum PendingState {
    Ready(Option<DialogOutcome>),
    Waiting(oneshot::Receiver<DialogOutcome>),
}

impl PendingDialog {
    fn ready(outcome: DialogOutcome) -> Self {
        Self {
            state: PendingState::Ready(Some(outcome)),
        }
    }

    fn waiting(receiver: oneshot::Receiver<DialogOutcome>) -> Self {
        Self {
            state: PendingState::Waiting(receiver),
        }
    }
}

impl Future for PendingDialog {
    type Output = DialogOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            PendingState::Ready(outcome) => {
                Poll::Ready(outcome.take().unwrap_or_else(DialogOutcome::dismissed))
            }
            PendingState::Waiting(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|result| result.unwrap_or_else(|_| DialogOutcome::dismissed())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerTarget;

    fn controller() -> DialogController {
        DialogController::builder()
            .settle_delay(Duration::ZERO)
            .build()
    }

    #[test]
    fn test_open_focuses_confirm_without_input() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("sure?"));

        assert!(dialog.is_open());
        assert_eq!(dialog.focus(), Some(DialogFocus::Confirm));
    }

    #[test]
    fn test_open_focuses_input_with_selection() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("name?").with_input("a.txt"));

        let snapshot = dialog.snapshot();
        let input = snapshot.view.unwrap().input.unwrap();
        assert_eq!(dialog.focus(), Some(DialogFocus::Input));
        assert!(input.selected);
        assert_eq!(input.value, "a.txt");
    }

    #[test]
    fn test_hidden_title_and_cancel() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("done").with_hide_cancel(true));

        let view = dialog.snapshot().view.unwrap();
        assert!(view.title.is_none());
        assert!(view.cancel_label.is_none());
        assert_eq!(view.confirm_label, "确定");
    }

    #[test]
    fn test_cancel_click_ignored_when_hidden() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("done").with_hide_cancel(true));

        assert_eq!(dialog.handle_event(DialogEvent::Cancel), EventDisposition::Ignored);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_tab_cycles_visible_controls() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("name?").with_input(""));

        dialog.handle_event(DialogEvent::Key(DialogKey::Tab));
        assert_eq!(dialog.focus(), Some(DialogFocus::Confirm));
        dialog.handle_event(DialogEvent::Key(DialogKey::Tab));
        assert_eq!(dialog.focus(), Some(DialogFocus::Cancel));
        dialog.handle_event(DialogEvent::Key(DialogKey::Tab));
        assert_eq!(dialog.focus(), Some(DialogFocus::Input));
        dialog.handle_event(DialogEvent::Key(DialogKey::BackTab));
        assert_eq!(dialog.focus(), Some(DialogFocus::Cancel));
    }

    #[test]
    fn test_content_click_does_not_dismiss() {
        let dialog = controller();
        let _pending = dialog.open_dialog(DialogOptions::new("sure?"));

        let disposition = dialog.handle_event(DialogEvent::Pointer(PointerTarget::Content));
        assert_eq!(disposition, EventDisposition::Ignored);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_events_ignored_when_closed() {
        let dialog = controller();
        assert_eq!(dialog.handle_event(DialogEvent::Confirm), EventDisposition::Ignored);
        assert!(!dialog.close(true));
    }

    #[test]
    fn test_close_without_runtime_hides_immediately() {
        let dialog = DialogController::new();
        let _pending = dialog.open_dialog(DialogOptions::new("sure?"));
        dialog.close(false);

        assert_eq!(dialog.snapshot().visibility, Visibility::Hidden);
        assert!(dialog.snapshot().view.is_none());
    }
}
