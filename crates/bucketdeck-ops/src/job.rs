//! Record of a batch run.

use bucketdeck_core::OperationTarget;

use crate::{OperationType, TargetFailure};

/// How a finished batch turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    AllFailed,
    Partial,
}

/// A batch of targets and what happened to each.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// The type of operation.
    pub operation: OperationType,
    /// Targets in selection order.
    pub targets: Vec<OperationTarget>,
    /// Targets the server accepted.
    pub succeeded: Vec<OperationTarget>,
    /// Targets that failed, with their error text.
    pub failed: Vec<TargetFailure>,
}

impl BatchJob {
    pub fn new(operation: OperationType, targets: Vec<OperationTarget>) -> Self {
        Self {
            operation,
            targets,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn record_success(&mut self, target: OperationTarget) {
        self.succeeded.push(target);
    }

    pub fn record_failure(&mut self, target: OperationTarget, error: impl Into<String>) {
        self.failed.push(TargetFailure::new(target, error));
    }

    /// Whether every target has been attempted.
    pub fn is_complete(&self) -> bool {
        self.succeeded.len() + self.failed.len() == self.targets.len()
    }

    /// Check if the batch was fully successful.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.failed.is_empty() {
            BatchOutcome::AllSucceeded
        } else if self.succeeded.is_empty() {
            BatchOutcome::AllFailed
        } else {
            BatchOutcome::Partial
        }
    }

    /// Paths of the failed targets, in selection order.
    pub fn failed_paths(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.target.path.as_str()).collect()
    }

    /// Short summary for logs.
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("{}: {} items", self.operation, self.succeeded.len())
        } else {
            format!(
                "{}: {} items, {} failed",
                self.operation,
                self.succeeded.len(),
                self.failed.len()
            )
        }
    }
}
