//! Headless driver for `--yes` runs.

use std::future::Future;
use std::io::Write;
use std::pin::pin;

use tracing::info;

use bucketdeck_dialog::{DialogController, DialogEvent, DialogKind};
use bucketdeck_ops::StatusReporter;

/// Run `work` without a terminal UI.
///
/// Confirmation dialogs are accepted as soon as they open; prompts are
/// cancelled, since there is nobody to type an answer. Every status message
/// is written to `out` as a line.
pub async fn run_unattended<F, W>(
    dialog: &DialogController,
    status: &StatusReporter,
    out: &mut W,
    work: F,
) -> F::Output
where
    F: Future,
    W: Write,
{
    let mut work = pin!(work);
    let mut dialog_rx = dialog.subscribe();
    let mut status_rx = status.subscribe();
    let mut printed = status.history().last().map_or(0, |m| m.id);

    loop {
        tokio::select! {
            biased;

            output = work.as_mut() => {
                print_new(status, out, &mut printed);
                return output;
            }

            Ok(()) = dialog_rx.changed() => {
                let snapshot = dialog_rx.borrow_and_update().clone();
                if snapshot.is_open()
                    && let Some(view) = snapshot.view
                {
                    let answer = match view.kind {
                        DialogKind::Confirm => DialogEvent::Confirm,
                        DialogKind::Prompt => DialogEvent::Cancel,
                    };
                    info!(message = %view.message, ?answer, "Answering dialog");
                    dialog.handle_event(answer);
                }
            }

            Ok(()) = status_rx.changed() => {
                status_rx.borrow_and_update();
                print_new(status, out, &mut printed);
            }
        }
    }
}

fn print_new<W: Write>(status: &StatusReporter, out: &mut W, printed: &mut u64) {
    let since = *printed;
    for message in status.history().iter().filter(|m| m.id > since) {
        let _ = writeln!(out, "{}", message.text);
        *printed = message.id;
    }
}
