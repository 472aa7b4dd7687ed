//! Remote operation types.

use std::path::Path;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use bucketdeck_core::{OperationTarget, OpsError, encode_path, file_name};

/// A file selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part.
    pub name: String,
    /// File contents.
    pub content: Vec<u8>,
}

impl UploadFile {
    /// Create an upload from in-memory contents.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a local file for upload.
    pub async fn from_path(path: &Path) -> Result<Self, OpsError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| OpsError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, content })
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// A request against the storage management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    /// Upload one file into a folder prefix.
    Upload { file: UploadFile, prefix: String },
    /// Delete a single object.
    DeleteFile { path: String },
    /// Delete a folder prefix and everything under it.
    DeleteFolder { prefix: String },
    /// Rename a single object within its folder.
    RenameFile { old_key: String, new_name: String },
    /// Rename a folder prefix.
    RenameFolder { old_prefix: String, new_name: String },
    /// Copy an object or folder to a full destination key.
    Copy {
        source: String,
        destination: String,
        is_folder: bool,
    },
    /// Move an object or folder to a full destination key.
    Move {
        source: String,
        destination: String,
        is_folder: bool,
    },
    /// Create an empty folder.
    CreateFolder { path: String },
}

impl RemoteOperation {
    /// Create a delete operation for a target.
    pub fn delete(target: &OperationTarget) -> Self {
        if target.is_dir() {
            Self::DeleteFolder {
                prefix: target.path.clone(),
            }
        } else {
            Self::DeleteFile {
                path: target.path.clone(),
            }
        }
    }

    /// Create a rename operation.
    pub fn rename(old_key: impl Into<String>, new_name: impl Into<String>, is_folder: bool) -> Self {
        if is_folder {
            Self::RenameFolder {
                old_prefix: old_key.into(),
                new_name: new_name.into(),
            }
        } else {
            Self::RenameFile {
                old_key: old_key.into(),
                new_name: new_name.into(),
            }
        }
    }

    /// The kind of operation.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::Upload { .. } => OperationType::Upload,
            Self::DeleteFile { .. } => OperationType::Delete,
            Self::DeleteFolder { .. } => OperationType::DeleteFolder,
            Self::RenameFile { .. } => OperationType::Rename,
            Self::RenameFolder { .. } => OperationType::RenameFolder,
            Self::Copy { .. } => OperationType::Copy,
            Self::Move { .. } => OperationType::Move,
            Self::CreateFolder { .. } => OperationType::CreateFolder,
        }
    }

    /// HTTP method for this operation.
    pub fn method(&self) -> Method {
        match self {
            Self::DeleteFile { .. } | Self::DeleteFolder { .. } => Method::DELETE,
            _ => Method::POST,
        }
    }

    /// Endpoint path, with storage keys percent-encoded per segment.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Upload { .. } => "/upload".to_string(),
            Self::DeleteFile { path } => format!("/delete/{}", encode_path(path)),
            Self::DeleteFolder { prefix } => format!("/delete_folder/{}", encode_path(prefix)),
            Self::RenameFile { old_key, .. } => format!("/rename/{}", encode_path(old_key)),
            Self::RenameFolder { old_prefix, .. } => {
                format!("/rename_folder/{}", encode_path(old_prefix))
            }
            Self::Copy { .. } => "/copy".to_string(),
            Self::Move { .. } => "/move".to_string(),
            Self::CreateFolder { .. } => "/create_folder".to_string(),
        }
    }

    /// JSON request body, if the operation sends one.
    pub fn json_body(&self) -> Option<Value> {
        match self {
            Self::RenameFile { new_name, .. } | Self::RenameFolder { new_name, .. } => {
                Some(json!({ "newName": new_name }))
            }
            Self::Copy {
                source,
                destination,
                is_folder,
            }
            | Self::Move {
                source,
                destination,
                is_folder,
            } => Some(json!({
                "source": source,
                "destination": destination,
                "is_folder": is_folder,
            })),
            Self::CreateFolder { path } => Some(json!({ "path": path })),
            Self::Upload { .. } | Self::DeleteFile { .. } | Self::DeleteFolder { .. } => None,
        }
    }

    /// The storage key this operation acts on.
    pub fn subject(&self) -> &str {
        match self {
            Self::Upload { file, .. } => &file.name,
            Self::DeleteFile { path } | Self::CreateFolder { path } => path,
            Self::DeleteFolder { prefix } => prefix,
            Self::RenameFile { old_key, .. } => old_key,
            Self::RenameFolder { old_prefix, .. } => old_prefix,
            Self::Copy { source, .. } | Self::Move { source, .. } => source,
        }
    }
}

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Upload,
    Delete,
    DeleteFolder,
    Rename,
    RenameFolder,
    Copy,
    Move,
    CreateFolder,
}

impl OperationType {
    /// Verb used in user-facing status messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Upload => "上传",
            Self::Delete | Self::DeleteFolder => "删除",
            Self::Rename | Self::RenameFolder => "重命名",
            Self::Copy => "复制",
            Self::Move => "移动",
            Self::CreateFolder => "创建",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "Upload"),
            Self::Delete => write!(f, "Delete"),
            Self::DeleteFolder => write!(f, "Delete folder"),
            Self::Rename => write!(f, "Rename"),
            Self::RenameFolder => write!(f, "Rename folder"),
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::CreateFolder => write!(f, "Create folder"),
        }
    }
}

/// Where a download comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadRequest {
    /// A `/download/…` or `/file/…` route on the storage server.
    ///
    /// The server may answer with a redirect to a signed third-party URL, so
    /// the request goes through the HTTP client's redirect following.
    Route {
        route: String,
        file_name: Option<String>,
    },
    /// Any other URL, fetched as-is.
    Direct {
        url: String,
        file_name: Option<String>,
    },
}

impl DownloadRequest {
    /// Download a storage key through the server's download route.
    pub fn for_key(key: &str) -> Self {
        let name = file_name(key);
        Self::Route {
            route: format!("/download/{}", encode_path(key)),
            file_name: (!name.is_empty()).then(|| name.to_string()),
        }
    }

    /// Classify a download link.
    pub fn from_url(url: &str, file_name: Option<String>) -> Result<Self, OpsError> {
        if url.is_empty() {
            return Err(OpsError::validation("✗ 无法下载：缺少下载链接"));
        }

        if is_managed_route(url) {
            Ok(Self::Route {
                route: url.to_string(),
                file_name,
            })
        } else {
            Ok(Self::Direct {
                url: url.to_string(),
                file_name,
            })
        }
    }

    /// Save under `name` instead of the name the request carries.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::Route { file_name, .. } | Self::Direct { file_name, .. } => {
                *file_name = Some(name.into());
            }
        }
        self
    }

    /// Name to save under, when known up front.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Route { file_name, .. } | Self::Direct { file_name, .. } => file_name.as_deref(),
        }
    }

    /// Human-readable label for status messages.
    pub fn label(&self) -> &str {
        match self {
            Self::Route { route, file_name } => file_name.as_deref().unwrap_or(route),
            Self::Direct { url, file_name } => file_name.as_deref().unwrap_or(url),
        }
    }
}

fn is_managed_route(url: &str) -> bool {
    url.starts_with("/download/") || url.starts_with("/file/")
}

/// One target that failed inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    /// The target that failed.
    pub target: OperationTarget,
    /// The user-facing error text.
    pub error: String,
}

impl TargetFailure {
    pub fn new(target: OperationTarget, error: impl Into<String>) -> Self {
        Self {
            target,
            error: error.into(),
        }
    }
}

impl std::fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.target.path, self.error)
    }
}
