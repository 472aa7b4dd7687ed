//! Operation targets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a target is a single object or a folder prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    File,
    Dir,
}

impl TargetKind {
    /// Check if this is a directory.
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Dir)
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Dir => write!(f, "dir"),
        }
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "dir" => Ok(Self::Dir),
            other => Err(format!("unknown target kind '{other}'")),
        }
    }
}

/// One storage path plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationTarget {
    /// Path relative to the bucket root. Folder prefixes end with `/`.
    pub path: String,
    /// The kind of entry.
    pub kind: TargetKind,
}

impl OperationTarget {
    /// Create a new target.
    pub fn new(path: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a file target.
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, TargetKind::File)
    }

    /// Create a directory target.
    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, TargetKind::Dir)
    }

    /// Check if this target is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

impl std::fmt::Display for OperationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}
