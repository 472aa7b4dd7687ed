//! Drives one operation while rendering its dialogs and status.

use std::future::Future;
use std::path::PathBuf;
use std::pin::pin;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use bucketdeck_dialog::DialogController;
use bucketdeck_ops::{ControlId, ControllerEvent, StatusReporter};

use crate::event::{KeyAction, dialog_event, pointer_event};
use crate::theme::Theme;
use crate::ui::{ActivityLog, DialogLayout, DialogModal, StatusLine};

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Redraw interval while nothing else happens.
const TICK_INTERVAL_MS: u64 = 250;

/// Terminal front end for a single operation.
pub struct App {
    dialog: DialogController,
    status: StatusReporter,
    events: Option<UnboundedReceiver<ControllerEvent>>,
    theme: Theme,
    title: String,
    /// Dialog layout from the last frame, for mouse hit testing.
    layout: Option<DialogLayout>,
    busy: bool,
    finished: bool,
    saved: Vec<PathBuf>,
    needs_redraw: bool,
}

enum Step {
    Continue,
    Interrupt,
    Exit,
}

impl App {
    pub fn new(dialog: DialogController, status: StatusReporter) -> Self {
        Self {
            dialog,
            status,
            events: None,
            theme: Theme::default(),
            title: "bucketdeck".to_string(),
            layout: None,
            busy: false,
            finished: false,
            saved: Vec::new(),
            needs_redraw: true,
        }
    }

    /// Follow controller events (busy controls, saved downloads).
    pub fn with_events(mut self, events: UnboundedReceiver<ControllerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run `work` to completion while handling input.
    ///
    /// Returns `None` if the user interrupted the operation. After the work
    /// finishes the screen stays up until the status line clears or a key is
    /// dismissed with `q`, `Esc` or `Enter`.
    pub async fn run<F>(mut self, mut terminal: DefaultTerminal, work: F) -> AppResult<Option<F::Output>>
    where
        F: Future,
    {
        let mut work = pin!(work);
        let mut output = None;

        let mut dialog_rx = self.dialog.subscribe();
        let mut status_rx = self.status.subscribe();
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
        let mut input = EventStream::new();

        loop {
            if self.finished && self.status.current().is_none() && !self.dialog.is_open() {
                break;
            }

            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = input.next() => {
                    match self.handle_input(event) {
                        Step::Continue => {}
                        Step::Exit => break,
                        Step::Interrupt => {
                            info!("Operation interrupted");
                            self.dialog.teardown();
                            return Ok(None);
                        }
                    }
                    self.needs_redraw = true;
                }

                result = work.as_mut(), if output.is_none() => {
                    output = Some(result);
                    self.finished = true;
                    self.needs_redraw = true;
                }

                Ok(()) = dialog_rx.changed() => {
                    self.needs_redraw = true;
                }

                Ok(()) = status_rx.changed() => {
                    self.needs_redraw = true;
                }

                Some(event) = async {
                    if let Some(rx) = &mut self.events {
                        rx.recv().await
                    } else {
                        std::future::pending().await
                    }
                } => {
                    self.handle_controller_event(event);
                }

                _ = interval.tick() => {}
            }
        }

        Ok(output)
    }

    fn handle_input(&mut self, event: Event) -> Step {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                if self.dialog.is_open()
                    && let Some(layout) = &self.layout
                    && let Some(event) = pointer_event(mouse, layout)
                {
                    self.dialog.handle_event(event);
                }
                Step::Continue
            }
            _ => Step::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Step {
        let action = KeyAction::from_key_event(key);
        if action == KeyAction::Interrupt {
            return match (self.finished, self.busy) {
                (true, _) => Step::Exit,
                // A running batch is never cut short.
                (false, true) => Step::Continue,
                (false, false) => Step::Interrupt,
            };
        }

        if self.dialog.is_open() {
            if let Some(event) = dialog_event(key, self.dialog.focus()) {
                self.dialog.handle_event(event);
            }
            return Step::Continue;
        }

        if self.finished && action == KeyAction::Dismiss {
            Step::Exit
        } else {
            Step::Continue
        }
    }

    fn handle_controller_event(&mut self, event: ControllerEvent) {
        debug!(?event, "Controller event");
        match event {
            ControllerEvent::ControlEnabled {
                control: ControlId::DeleteSelected,
                enabled,
            } => self.busy = !enabled,
            ControllerEvent::DownloadSaved { path } => self.saved.push(path),
            ControllerEvent::RefreshScheduled { .. }
            | ControllerEvent::NavigateScheduled { .. }
            | ControllerEvent::BatchFinished { .. } => {}
        }
        self.needs_redraw = true;
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let mut title = vec![Span::styled(format!(" {} ", self.title), self.theme.title)];
        if self.busy {
            title.push(Span::styled("working…", self.theme.help_desc));
        }
        for path in &self.saved {
            title.push(Span::styled(
                format!("  saved {}", path.display()),
                self.theme.help_desc,
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), header);

        let history = self.status.history();
        frame.render_widget(ActivityLog::new(&self.theme, &history), body);

        let current = self.status.current();
        let hint = if self.finished {
            "q to exit "
        } else if self.busy {
            "batch running "
        } else {
            "^C abort "
        };
        frame.render_widget(StatusLine::new(&self.theme, current.as_ref()).hint(hint), footer);

        let snapshot = self.dialog.snapshot();
        self.layout = snapshot
            .view
            .as_ref()
            .filter(|_| snapshot.is_open())
            .map(|view| DialogLayout::compute(area, view));
        frame.render_widget(DialogModal::new(&self.theme, &snapshot), area);
    }
}
