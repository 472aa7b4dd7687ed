//! Client and timing configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::OpsError;

/// Configuration for talking to the storage API.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// Base URL of the storage management server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for each request in milliseconds.
    #[builder(default = "30_000")]
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum redirects followed for downloads.
    #[builder(default = "10")]
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User agent sent with every request.
    #[builder(default = "default_user_agent()")]
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("bucketdeck/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.request_timeout_ms {
            validate_timeout(timeout)?;
        }
        match self.base_url {
            Some(ref url) => validate_base_url(url),
            None => Err("Base URL is required".to_string()),
        }
    }
}

fn validate_timeout(timeout_ms: u64) -> Result<(), String> {
    if timeout_ms == 0 {
        return Err("Request timeout must be greater than zero".to_string());
    }
    Ok(())
}

fn validate_base_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("Base URL cannot be empty".to_string());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("Base URL must start with http:// or https://: {url}"));
    }
    Ok(())
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create a config for a server with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Absolute URL for an endpoint path such as `/upload`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Check the config after loading it from a file.
    pub fn validate(&self) -> Result<(), OpsError> {
        validate_base_url(&self.base_url)
            .and_then(|()| validate_timeout(self.request_timeout_ms))
            .map_err(|message| OpsError::InvalidConfig { message })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

/// Delays used for status expiry, page refreshes and dialog animation.
///
/// All values are milliseconds.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct TimingConfig {
    /// Default lifetime of a success or validation status message.
    pub status_hide_ms: u64,
    /// Lifetime of the final status after a fully successful batch.
    pub batch_success_hide_ms: u64,
    /// Lifetime of the final status after a failed or partial batch.
    pub batch_failure_hide_ms: u64,
    /// Refresh delay after an upload.
    pub refresh_after_upload_ms: u64,
    /// Refresh delay after deleting a single file.
    pub refresh_after_delete_ms: u64,
    /// Refresh delay after rename, copy, move, folder creation and batches.
    pub refresh_after_change_ms: u64,
    /// Navigation delay after deleting the folder being viewed.
    pub navigate_after_folder_delete_ms: u64,
    /// Time between a dialog starting to close and becoming hidden.
    pub dialog_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            status_hide_ms: 2000,
            batch_success_hide_ms: 3000,
            batch_failure_hide_ms: 4000,
            refresh_after_upload_ms: 2000,
            refresh_after_delete_ms: 2000,
            refresh_after_change_ms: 1500,
            navigate_after_folder_delete_ms: 1500,
            dialog_settle_ms: 200,
        }
    }
}

impl TimingConfig {
    /// Create a new timing config builder.
    pub fn builder() -> TimingConfigBuilder {
        TimingConfigBuilder::default()
    }

    pub fn status_hide(&self) -> Duration {
        Duration::from_millis(self.status_hide_ms)
    }

    pub fn batch_success_hide(&self) -> Duration {
        Duration::from_millis(self.batch_success_hide_ms)
    }

    pub fn batch_failure_hide(&self) -> Duration {
        Duration::from_millis(self.batch_failure_hide_ms)
    }

    pub fn refresh_after_upload(&self) -> Duration {
        Duration::from_millis(self.refresh_after_upload_ms)
    }

    pub fn refresh_after_delete(&self) -> Duration {
        Duration::from_millis(self.refresh_after_delete_ms)
    }

    pub fn refresh_after_change(&self) -> Duration {
        Duration::from_millis(self.refresh_after_change_ms)
    }

    pub fn navigate_after_folder_delete(&self) -> Duration {
        Duration::from_millis(self.navigate_after_folder_delete_ms)
    }

    pub fn dialog_settle(&self) -> Duration {
        Duration::from_millis(self.dialog_settle_ms)
    }
}

/// Top-level configuration file (`config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bucketdeck")
            .join("config.toml")
    }

    /// Load configuration from `path`, or from [`Self::default_path`].
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, OpsError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| OpsError::io(&path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, OpsError> {
        let config: Self = toml::from_str(content).map_err(|e| OpsError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.client.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://files.example.com/")
            .request_timeout_ms(5_000u64)
            .build()
            .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.endpoint("/upload"), "https://files.example.com/upload");
    }

    #[test]
    fn test_client_config_builder_rejects_bad_url() {
        assert!(ClientConfig::builder().build().is_err());
        assert!(ClientConfig::builder().base_url("").build().is_err());
        assert!(ClientConfig::builder().base_url("ftp://x").build().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let built = ClientConfig::builder()
            .base_url("http://127.0.0.1:5000")
            .request_timeout_ms(0u64)
            .build();
        assert!(built.is_err());

        let mut config = ClientConfig::new("http://127.0.0.1:5000");
        config.request_timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(OpsError::InvalidConfig { .. })
        ));

        let err = AppConfig::from_toml(
            "[client]\nbase_url = \"http://127.0.0.1:5000\"\nrequest_timeout_ms = 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, OpsError::InvalidConfig { .. }));
    }

    #[test]
    fn test_timing_defaults() {
        let timing = TimingConfig::default();
        assert_eq!(timing.status_hide(), Duration::from_millis(2000));
        assert_eq!(timing.refresh_after_delete(), Duration::from_millis(2000));
        assert_eq!(timing.dialog_settle(), Duration::from_millis(200));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            [client]
            base_url = "https://r2.example.com"

            [timing]
            status_hide_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.client.base_url, "https://r2.example.com");
        assert_eq!(config.client.request_timeout_ms, 30_000);
        assert_eq!(config.timing.status_hide_ms, 500);
        assert_eq!(config.timing.batch_failure_hide_ms, 4000);
    }

    #[test]
    fn test_from_toml_invalid_url() {
        let err = AppConfig::from_toml("[client]\nbase_url = \"localhost\"\n").unwrap_err();
        assert!(matches!(err, OpsError::InvalidConfig { .. }));
    }
}
