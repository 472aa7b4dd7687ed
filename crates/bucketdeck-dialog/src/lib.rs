//! Modal confirm/prompt dialog controller.
//!
//! A [`DialogController`] owns at most one open dialog session. Opening a
//! dialog returns a [`PendingDialog`] future that resolves exactly once, when
//! the user confirms, cancels, presses Escape or clicks the backdrop. Input
//! arrives as explicit [`DialogEvent`]s; renderers follow the dialog through
//! [`DialogController::subscribe`].
//!
//! ```rust,no_run
//! use bucketdeck_dialog::{ConfirmOptions, DialogController};
//!
//! # async fn demo() {
//! let dialog = DialogController::new();
//! if dialog.show_confirm("Delete docs/a.txt?", ConfirmOptions::default()).await {
//!     // proceed
//! }
//! # }
//! ```

mod controller;
mod event;
mod focus;
mod input;
mod options;

pub use controller::{
    DialogController, DialogControllerBuilder, DialogSnapshot, DialogView, InputView,
    PendingDialog, Visibility,
};
pub use event::{DialogEvent, DialogKey, EventDisposition, PointerTarget};
pub use focus::{DialogFocus, FocusHost, Focusable};
pub use input::InputState;
pub use options::{ConfirmOptions, DialogKind, DialogOptions, DialogOutcome, PromptOptions};

/// Default confirm button label.
pub const DEFAULT_CONFIRM_LABEL: &str = "确定";

/// Default cancel button label.
pub const DEFAULT_CANCEL_LABEL: &str = "取消";

/// Default time between a dialog starting to close and being hidden.
pub const DEFAULT_SETTLE_DELAY: std::time::Duration = std::time::Duration::from_millis(200);
