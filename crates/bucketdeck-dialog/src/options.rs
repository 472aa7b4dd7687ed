//! Dialog options and outcomes.

use crate::{DEFAULT_CANCEL_LABEL, DEFAULT_CONFIRM_LABEL};

/// Whether a session asks for confirmation or for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Prompt,
}

/// Everything needed to open one dialog session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Header text. Hidden when empty.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Confirm button text. Defaults to "确定".
    pub confirm_label: Option<String>,
    /// Cancel button text. Defaults to "取消".
    pub cancel_label: Option<String>,
    /// Hide the cancel button. Escape and the backdrop still cancel.
    pub hide_cancel: bool,
    /// Show a single-line text field.
    pub show_input: bool,
    /// Initial contents of the text field.
    pub default_value: String,
    /// Hint shown while the text field is empty.
    pub placeholder: String,
}

impl DialogOptions {
    /// Create options with a message and nothing else.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    pub fn with_hide_cancel(mut self, hide: bool) -> Self {
        self.hide_cancel = hide;
        self
    }

    /// Add a text field seeded with `default_value`.
    pub fn with_input(mut self, default_value: impl Into<String>) -> Self {
        self.show_input = true;
        self.default_value = default_value.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The kind of session these options open.
    pub fn kind(&self) -> DialogKind {
        if self.show_input {
            DialogKind::Prompt
        } else {
            DialogKind::Confirm
        }
    }

    /// Confirm label with the default applied.
    pub fn confirm_label(&self) -> &str {
        non_empty(self.confirm_label.as_deref()).unwrap_or(DEFAULT_CONFIRM_LABEL)
    }

    /// Cancel label with the default applied.
    pub fn cancel_label(&self) -> &str {
        non_empty(self.cancel_label.as_deref()).unwrap_or(DEFAULT_CANCEL_LABEL)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// How a session ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOutcome {
    pub confirmed: bool,
    /// Raw, untrimmed input contents. Only present when the session was
    /// confirmed and showed an input field.
    pub value: Option<String>,
}

impl DialogOutcome {
    /// A confirmed outcome.
    pub fn confirmed(value: Option<String>) -> Self {
        Self {
            confirmed: true,
            value,
        }
    }

    /// A cancelled, dismissed or refused outcome.
    pub fn dismissed() -> Self {
        Self::default()
    }
}

/// Options for [`crate::DialogController::show_confirm`].
#[derive(Debug, Clone, Default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
    pub hide_cancel: bool,
}

impl ConfirmOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    pub fn with_hide_cancel(mut self, hide: bool) -> Self {
        self.hide_cancel = hide;
        self
    }

    pub(crate) fn into_dialog(self, message: String) -> DialogOptions {
        DialogOptions {
            title: self.title.unwrap_or_else(|| "确认操作".to_string()),
            message,
            confirm_label: self.confirm_label,
            cancel_label: self.cancel_label,
            hide_cancel: self.hide_cancel,
            ..Default::default()
        }
    }
}

/// Options for [`crate::DialogController::show_prompt`].
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub title: Option<String>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
    pub default_value: String,
    pub placeholder: String,
}

impl PromptOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub(crate) fn into_dialog(self, message: String) -> DialogOptions {
        DialogOptions {
            title: self.title.unwrap_or_else(|| "请输入内容".to_string()),
            message,
            confirm_label: self.confirm_label,
            cancel_label: self.cancel_label,
            hide_cancel: false,
            show_input: true,
            default_value: self.default_value,
            placeholder: self.placeholder,
        }
    }
}
