//! Core types and configuration for bucketdeck.
//!
//! This crate provides the data structures shared by the dialog controller,
//! the remote operation client and the terminal front end: operation
//! targets, the decoded API response, the error taxonomy, configuration and
//! storage path helpers.

mod config;
mod error;
mod path;
mod result;
mod target;

pub use config::{AppConfig, ClientConfig, ClientConfigBuilder, TimingConfig, TimingConfigBuilder};
pub use error::OpsError;
pub use path::{copy_destination, encode_path, file_name, join_prefix, parent_location};
pub use result::RemoteOperationResult;
pub use target::{OperationTarget, TargetKind};
