//! Terminal front end for bucketdeck.
//!
//! Draws the modal dialog and the status line while one storage operation
//! runs, and feeds keyboard and mouse input back into the dialog controller.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bucketdeck_dialog::{ConfirmOptions, DialogController};
//! use bucketdeck_ops::StatusReporter;
//! use bucketdeck_tui::App;
//!
//! # async fn demo() -> bucketdeck_tui::AppResult<()> {
//! let dialog = DialogController::new();
//! let status = StatusReporter::new();
//! let app = App::new(dialog.clone(), status.clone());
//!
//! let answer = bucketdeck_tui::run(app, async {
//!     dialog.show_confirm("Delete docs/a.txt?", ConfirmOptions::default()).await
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Keys
//!
//! - `Tab`/`Shift-Tab` - Move focus inside the dialog
//! - `Enter` - Submit the prompt or press the focused button
//! - `y`/`n` - Answer from a focused button
//! - `Esc` - Cancel the dialog
//! - `Ctrl-C` - Abandon the operation (ignored while a batch is running)

pub mod app;
mod event;
mod theme;
mod ui;
mod unattended;

use std::future::Future;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

pub use app::{App, AppResult};
pub use theme::Theme;
pub use unattended::run_unattended;

/// Take over the terminal and run `work` under `app`.
///
/// Returns `None` when the user abandoned the operation.
pub async fn run<F: Future>(app: App, work: F) -> AppResult<Option<F::Output>> {
    let terminal = ratatui::init();
    if let Err(e) = execute!(std::io::stdout(), EnableMouseCapture) {
        tracing::warn!(error = %e, "Mouse capture unavailable");
    }

    let result = app.run(terminal, work).await;

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}
