//! Remote storage operations for bucketdeck.
//!
//! This crate sends management requests (upload, delete, rename, copy, move,
//! create folder, download) to the storage server, runs batches over a
//! selection with a single confirmation, and reports progress through a
//! shared status line and a stream of [`ControllerEvent`]s for the host.

mod actions;
mod batch;
mod client;
mod context;
mod events;
mod job;
mod operation;
mod status;

pub use actions::{ActionOutcome, DeleteOptions, FileActions, TransferKind};
pub use batch::{BatchOperation, BatchRunner};
pub use client::{HttpStorageClient, StorageApi};
pub use context::OperationContext;
pub use events::{ControlId, ControllerEvent, EventSink};
pub use job::{BatchJob, BatchOutcome};
pub use operation::{DownloadRequest, OperationType, RemoteOperation, TargetFailure, UploadFile};
pub use status::{STATUS_HISTORY_LIMIT, StatusLevel, StatusMessage, StatusReporter, StatusTicket};
