//! HTTP client for the storage management API.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use bucketdeck_core::{ClientConfig, OpsError, RemoteOperationResult};

use crate::{DownloadRequest, RemoteOperation};

/// File name used when neither the caller nor the URL supplies one.
const FALLBACK_DOWNLOAD_NAME: &str = "download";

/// The storage management API.
///
/// Every call resolves to `Ok(())` when the server answered
/// `{"success": true}`; transport failures, unparseable bodies and
/// `{"success": false}` all surface as [`OpsError`].
pub trait StorageApi: Send + Sync {
    /// Execute one mutating operation.
    fn execute(
        &self,
        operation: RemoteOperation,
    ) -> impl Future<Output = Result<(), OpsError>> + Send;

    /// Fetch a file into `dest_dir`, returning the path written.
    fn download(
        &self,
        request: DownloadRequest,
        dest_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, OpsError>> + Send;
}

/// [`StorageApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorageClient {
    http: Client,
    config: ClientConfig,
}

impl HttpStorageClient {
    /// Build a client from validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, OpsError> {
        config.validate()?;

        // Deadlines are per request in `execute`; downloads only bound stalls.
        let http = Client::builder()
            .connect_timeout(config.request_timeout())
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OpsError::InvalidConfig {
                message: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn resolve(&self, request: &DownloadRequest) -> String {
        match request {
            DownloadRequest::Route { route, .. } => self.config.endpoint(route),
            DownloadRequest::Direct { url, .. } if is_absolute(url) => url.clone(),
            DownloadRequest::Direct { url, .. } => self.config.endpoint(url),
        }
    }
}

impl StorageApi for HttpStorageClient {
    async fn execute(&self, operation: RemoteOperation) -> Result<(), OpsError> {
        let url = self.config.endpoint(&operation.endpoint());
        let method = operation.method();
        let body = operation.json_body();
        let kind = operation.operation_type();
        debug!(%kind, %method, %url, "Sending operation");

        let builder = match operation {
            RemoteOperation::Upload { file, prefix } => {
                let part = Part::bytes(file.content).file_name(file.name);
                let form = Form::new().part("file", part).text("prefix", prefix);
                self.http.post(&url).multipart(form)
            }
            _ => {
                let builder = self.http.request(method, &url);
                match body {
                    Some(json) => builder.json(&json),
                    None => builder,
                }
            }
        };

        let response = builder
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(OpsError::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(OpsError::transport)?;

        // Error statuses still carry a JSON result body.
        let result = RemoteOperationResult::decode(&bytes).inspect_err(|e| {
            warn!(%kind, %status, error = %e, "Unreadable response body");
        })?;

        if let Some(message) = &result.message {
            debug!(%kind, %status, %message, "Server message");
        }
        result.into_result()
    }

    async fn download(
        &self,
        request: DownloadRequest,
        dest_dir: &Path,
    ) -> Result<PathBuf, OpsError> {
        let url = self.resolve(&request);
        debug!(%url, "Starting download");

        let stall = self.config.request_timeout();
        let response = within(stall, self.http.get(&url).send()).await?;
        let response = check_download_status(response, stall).await?;

        let name = request
            .file_name()
            .and_then(safe_file_name)
            .or_else(|| name_from_url(response.url()))
            .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string());
        let dest = dest_dir.join(name);

        if let Err(e) = write_body(response, &dest, stall).await {
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(e);
        }

        info!(path = %dest.display(), "Download saved");
        Ok(dest)
    }
}

/// Await a transport step, failing if it makes no progress within `limit`.
async fn within<T>(
    limit: Duration,
    step: impl Future<Output = reqwest::Result<T>>,
) -> Result<T, OpsError> {
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result.map_err(OpsError::transport),
        Err(_) => Err(OpsError::transport(format!(
            "no response within {} ms",
            limit.as_millis()
        ))),
    }
}

async fn check_download_status(response: Response, stall: Duration) -> Result<Response, OpsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = within(stall, response.bytes()).await?;
    match RemoteOperationResult::decode(&bytes) {
        Ok(result) if !result.success => Err(OpsError::application(result.error)),
        _ => Err(OpsError::transport(format!("HTTP {status}"))),
    }
}

/// Stream the body to `dest`. Only a gap longer than `stall` between chunks
/// aborts the transfer.
async fn write_body(mut response: Response, dest: &Path, stall: Duration) -> Result<(), OpsError> {
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| OpsError::io(dest, e))?;

    while let Some(chunk) = within(stall, response.chunk()).await? {
        file.write_all(&chunk)
            .await
            .map_err(|e| OpsError::io(dest, e))?;
    }

    file.flush().await.map_err(|e| OpsError::io(dest, e))
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Reduce a caller-supplied name to a single path component.
fn safe_file_name(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

fn name_from_url(url: &reqwest::Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    safe_file_name(&decoded)
}
