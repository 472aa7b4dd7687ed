//! Error taxonomy for remote storage operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while validating, sending or interpreting an operation.
///
/// The `Display` output of every variant is the text shown to the user, so
/// transport and application messages are carried verbatim.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Rejected before any request was sent.
    #[error("{message}")]
    Validation { message: String },

    /// The request could not be completed (connection, timeout, redirect loop).
    #[error("{message}")]
    Transport { message: String },

    /// The server answered with something that is not a JSON operation result,
    /// e.g. an HTML gateway error page.
    #[error("Invalid server response: {message}")]
    InvalidResponse { message: String },

    /// The server reported `success: false`.
    #[error("{message}")]
    Application { message: String },

    /// Local I/O failure (reading an upload, writing a download).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl OpsError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a transport error from anything the transport layer raised.
    pub fn transport(error: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }

    /// Create an application error from the server-supplied `error` field.
    pub fn application(error: Option<String>) -> Self {
        Self::Application {
            message: error.unwrap_or_else(|| "未知错误".to_string()),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure happened below the application protocol.
    ///
    /// Unparseable bodies count as transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::InvalidResponse { .. })
    }

    /// The message surfaced to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_is_verbatim() {
        let err = OpsError::application(Some("locked".to_string()));
        assert_eq!(err.user_message(), "locked");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_application_error_without_text() {
        let err = OpsError::application(None);
        assert_eq!(err.user_message(), "未知错误");
    }

    #[test]
    fn test_invalid_response_counts_as_transport() {
        let err = OpsError::InvalidResponse {
            message: "expected value at line 1 column 1".into(),
        };
        assert!(err.is_transport());
        assert!(OpsError::transport("connection refused").is_transport());
    }
}
