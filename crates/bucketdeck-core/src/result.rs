//! The decoded shape of every storage API response.

use serde::{Deserialize, Serialize};

use crate::OpsError;

/// `{success, error?}` as returned by every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOperationResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Informational text sent alongside successful responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RemoteOperationResult {
    /// Decode a response body.
    ///
    /// Anything that is not a JSON object with a boolean `success` field is an
    /// [`OpsError::InvalidResponse`], regardless of the HTTP status.
    pub fn decode(body: &[u8]) -> Result<Self, OpsError> {
        serde_json::from_slice(body).map_err(|e| OpsError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// Convert into the operation outcome.
    pub fn into_result(self) -> Result<(), OpsError> {
        if self.success {
            Ok(())
        } else {
            Err(OpsError::application(self.error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let result =
            RemoteOperationResult::decode(br#"{"success": true, "message": "File deleted successfully"}"#)
                .unwrap();
        assert!(result.success);
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_decode_failure_carries_server_text() {
        let result = RemoteOperationResult::decode(br#"{"success": false, "error": "locked"}"#).unwrap();
        let err = result.into_result().unwrap_err();
        assert!(matches!(err, OpsError::Application { ref message } if message == "locked"));
    }

    #[test]
    fn test_decode_html_page_is_invalid_response() {
        let err = RemoteOperationResult::decode(b"<html><body>504 Gateway Time-out</body></html>")
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_decode_missing_success_field() {
        let err = RemoteOperationResult::decode(br#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, OpsError::InvalidResponse { .. }));
    }
}
