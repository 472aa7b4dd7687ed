//! Serial batch execution over a selection.

use tracing::{debug, info, warn};

use bucketdeck_core::OperationTarget;
use bucketdeck_dialog::ConfirmOptions;

use crate::context::OperationContext;
use crate::events::ControlGuard;
use crate::{
    BatchJob, BatchOutcome, ControlId, ControllerEvent, OperationType, RemoteOperation,
    StatusLevel, StorageApi,
};

/// Operations that can run over a whole selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    /// Delete every selected file. Folders are rejected.
    Delete,
}

impl BatchOperation {
    pub fn operation_type(self) -> OperationType {
        match self {
            Self::Delete => OperationType::Delete,
        }
    }

    /// The control disabled while the batch runs.
    pub fn trigger(self) -> ControlId {
        match self {
            Self::Delete => ControlId::DeleteSelected,
        }
    }

    fn request(self, target: &OperationTarget) -> RemoteOperation {
        match self {
            Self::Delete => RemoteOperation::DeleteFile {
                path: target.path.clone(),
            },
        }
    }

    fn confirm_message(self, targets: &[OperationTarget]) -> String {
        match (self, targets) {
            (Self::Delete, [only]) => format!("确定要删除 \"{}\" 吗？", only.path),
            (Self::Delete, _) => format!("确定要删除选中的 {} 个文件吗？", targets.len()),
        }
    }

    fn confirm_options(self) -> ConfirmOptions {
        match self {
            Self::Delete => ConfirmOptions::titled("批量删除").with_confirm_label("删除"),
        }
    }

    fn validate(self, targets: &[OperationTarget]) -> Result<(), &'static str> {
        match self {
            Self::Delete if targets.is_empty() => Err("✗ 请先选择要删除的项目"),
            Self::Delete if targets.iter().any(OperationTarget::is_dir) => {
                Err("✗ 暂不支持批量删除文件夹，请仅选择文件")
            }
            Self::Delete => Ok(()),
        }
    }

    fn progress_message(self, count: usize) -> String {
        match self {
            Self::Delete => format!("正在删除 {count} 个文件..."),
        }
    }

    fn final_message(self, job: &BatchJob) -> String {
        match (self, job.outcome()) {
            (Self::Delete, BatchOutcome::AllSucceeded) => {
                format!("✓ 已删除 {} 个文件", job.succeeded.len())
            }
            (Self::Delete, BatchOutcome::AllFailed) => "✗ 删除失败，请稍后重试".to_string(),
            (Self::Delete, BatchOutcome::Partial) => {
                format!("删除部分文件失败：{}", job.failed_paths().join(", "))
            }
        }
    }
}

/// Runs one operation over a selection with a single confirmation.
pub struct BatchRunner<A> {
    ctx: OperationContext<A>,
}

impl<A: StorageApi> BatchRunner<A> {
    pub fn new(ctx: OperationContext<A>) -> Self {
        Self { ctx }
    }

    /// Validate, confirm once, then execute each target in order.
    ///
    /// Returns `None` when the selection is rejected or the user does not
    /// confirm; no request is sent in either case.
    pub async fn run_batch(
        &self,
        targets: Vec<OperationTarget>,
        operation: BatchOperation,
    ) -> Option<BatchJob> {
        let status = self.ctx.status();
        let timing = self.ctx.timing();

        if let Err(message) = operation.validate(&targets) {
            debug!(count = targets.len(), "Batch rejected: {message}");
            status.show_transient(message, StatusLevel::Error, timing.status_hide());
            return None;
        }

        let confirmed = self
            .ctx
            .dialog()
            .show_confirm(
                operation.confirm_message(&targets),
                operation.confirm_options(),
            )
            .await;
        if !confirmed {
            debug!(count = targets.len(), "Batch not confirmed");
            return None;
        }

        let guard = ControlGuard::disable(self.ctx.events(), operation.trigger());
        let progress = status.update(
            operation.progress_message(targets.len()),
            StatusLevel::Neutral,
        );

        let mut job = BatchJob::new(operation.operation_type(), targets);
        let pending = job.targets.clone();
        for target in pending {
            match self.ctx.api().execute(operation.request(&target)).await {
                Ok(()) => {
                    debug!(path = %target.path, "Batch item done");
                    job.record_success(target);
                }
                Err(e) => {
                    warn!(path = %target.path, error = %e, "Batch item failed");
                    job.record_failure(target, e.user_message());
                }
            }
        }

        drop(guard);
        status.hide(progress);
        self.finish(operation, &job);

        Some(job)
    }

    fn finish(&self, operation: BatchOperation, job: &BatchJob) {
        let timing = self.ctx.timing();
        let outcome = job.outcome();
        info!(summary = %job.summary(), "Batch finished");

        let message = operation.final_message(job);
        match outcome {
            BatchOutcome::AllSucceeded => {
                self.ctx.status().show_transient(
                    message,
                    StatusLevel::Success,
                    timing.batch_success_hide(),
                );
            }
            BatchOutcome::AllFailed | BatchOutcome::Partial => {
                self.ctx.status().show_transient(
                    message,
                    StatusLevel::Error,
                    timing.batch_failure_hide(),
                );
            }
        }

        if outcome != BatchOutcome::AllFailed {
            self.ctx.schedule_refresh(timing.refresh_after_change());
        }

        self.ctx.events().emit(ControllerEvent::BatchFinished {
            operation: job.operation,
            succeeded: job.succeeded.len(),
            failed: job.failed.len(),
        });
    }
}
