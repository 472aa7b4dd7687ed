//! Single-target flows: dialog, request, status and follow-up.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use bucketdeck_core::{OperationTarget, copy_destination, join_prefix, parent_location};
use bucketdeck_dialog::{ConfirmOptions, PromptOptions};

use crate::context::OperationContext;
use crate::{
    BatchJob, BatchOperation, BatchRunner, ControllerEvent, DownloadRequest, RemoteOperation,
    StatusLevel, StorageApi, UploadFile,
};

/// How a flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted every request.
    Completed,
    /// At least one request failed; the error is on the status line.
    Failed,
    /// The user backed out, or there was nothing to do.
    Abandoned,
}

impl ActionOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Options for [`FileActions::delete_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Skip the confirmation dialog.
    pub skip_confirm: bool,
    /// Do not schedule a refresh on success.
    pub suppress_reload: bool,
    /// Do not touch the status line.
    pub suppress_status: bool,
}

/// Copy or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Copy,
    Move,
}

impl TransferKind {
    fn label(self) -> &'static str {
        match self {
            Self::Copy => "复制",
            Self::Move => "移动",
        }
    }

    fn operation(self, source: String, destination: String, is_folder: bool) -> RemoteOperation {
        match self {
            Self::Copy => RemoteOperation::Copy {
                source,
                destination,
                is_folder,
            },
            Self::Move => RemoteOperation::Move {
                source,
                destination,
                is_folder,
            },
        }
    }
}

enum FollowUp {
    Nothing,
    Refresh(Duration),
    Navigate { to: String, after: Duration },
}

/// Status text and follow-up for one request.
struct Flow {
    progress: Option<String>,
    success: String,
    failure: String,
    follow_up: FollowUp,
    quiet: bool,
}

impl Flow {
    fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            progress: None,
            success: success.into(),
            failure: failure.into(),
            follow_up: FollowUp::Nothing,
            quiet: false,
        }
    }

    fn progress(mut self, text: impl Into<String>) -> Self {
        self.progress = Some(text.into());
        self
    }

    fn then(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = follow_up;
        self
    }

    fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// The user-facing file operations.
pub struct FileActions<A> {
    ctx: OperationContext<A>,
}

impl<A: StorageApi> FileActions<A> {
    pub fn new(ctx: OperationContext<A>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &OperationContext<A> {
        &self.ctx
    }

    /// Upload files one after another into `prefix`.
    pub async fn upload_files(&self, files: Vec<UploadFile>, prefix: &str) -> ActionOutcome {
        if files.is_empty() {
            return ActionOutcome::Abandoned;
        }

        let mut outcome = ActionOutcome::Completed;
        for file in files {
            let name = file.name.clone();
            let flow = Flow::new(
                format!("✓ {name} 上传成功！"),
                format!("✗ {name} 上传失败"),
            )
            .progress(format!("正在上传: {name}..."))
            .then(FollowUp::Refresh(self.ctx.timing().refresh_after_upload()));

            let operation = RemoteOperation::Upload {
                file,
                prefix: prefix.to_string(),
            };
            if self.perform(operation, flow).await == ActionOutcome::Failed {
                outcome = ActionOutcome::Failed;
            }
        }
        outcome
    }

    /// Ask for a storage path and delete it.
    pub async fn prompt_delete(&self) -> ActionOutcome {
        let options = PromptOptions::titled("删除文件")
            .with_placeholder("folder/file.jpg")
            .with_confirm_label("删除");
        let path = self
            .ctx
            .dialog()
            .show_prompt(
                "请输入要删除的文件路径（相对于存储桶），例如：folder/file.jpg",
                options,
            )
            .await;

        match path {
            Some(path) => self.delete_file(&path, DeleteOptions::default()).await,
            None => ActionOutcome::Abandoned,
        }
    }

    /// Delete one file.
    pub async fn delete_file(&self, path: &str, options: DeleteOptions) -> ActionOutcome {
        if !options.skip_confirm {
            let confirmed = self
                .ctx
                .dialog()
                .show_confirm(
                    format!("确定要删除 \"{path}\" 吗？"),
                    ConfirmOptions::titled("删除文件").with_confirm_label("删除"),
                )
                .await;
            if !confirmed {
                return ActionOutcome::Abandoned;
            }
        }

        let follow_up = if options.suppress_reload {
            FollowUp::Nothing
        } else {
            FollowUp::Refresh(self.ctx.timing().refresh_after_delete())
        };
        let flow = Flow::new("✓ 文件删除成功！", "✗ 删除失败")
            .progress(format!("正在删除: {path}..."))
            .then(follow_up)
            .quiet(options.suppress_status);

        let operation = RemoteOperation::DeleteFile {
            path: path.to_string(),
        };
        self.perform(operation, flow).await
    }

    /// Delete a folder and everything under it, then leave it.
    pub async fn delete_folder(&self, prefix: &str) -> ActionOutcome {
        let confirmed = self
            .ctx
            .dialog()
            .show_confirm(
                format!("确定要删除文件夹 \"{prefix}\" 及其所有内容吗？此操作不可逆！"),
                ConfirmOptions::titled("删除文件夹").with_confirm_label("确认删除"),
            )
            .await;
        if !confirmed {
            return ActionOutcome::Abandoned;
        }

        let flow = Flow::new("✓ 文件夹删除成功！", "✗ 删除失败")
            .progress(format!("正在删除文件夹: {prefix}..."))
            .then(FollowUp::Navigate {
                to: parent_location(prefix),
                after: self.ctx.timing().navigate_after_folder_delete(),
            });

        let operation = RemoteOperation::DeleteFolder {
            prefix: prefix.to_string(),
        };
        self.perform(operation, flow).await
    }

    /// Delete every selected file after one confirmation.
    pub async fn delete_selected(&self, targets: Vec<OperationTarget>) -> Option<BatchJob> {
        BatchRunner::new(self.ctx.clone())
            .run_batch(targets, BatchOperation::Delete)
            .await
    }

    /// Ask for a new name and rename. Unchanged names are skipped.
    pub async fn prompt_rename(&self, old_key: &str, old_name: &str, is_folder: bool) -> ActionOutcome {
        let title = if is_folder { "重命名文件夹" } else { "重命名文件" };
        let options = PromptOptions::titled(title)
            .with_default_value(old_name)
            .with_confirm_label("重命名");
        let new_name = self.ctx.dialog().show_prompt("请输入新的名称：", options).await;

        match new_name {
            Some(new_name) if new_name != old_name => {
                self.rename(old_key, &new_name, is_folder).await
            }
            Some(_) => {
                debug!(old_key, "Rename skipped, name unchanged");
                ActionOutcome::Abandoned
            }
            None => ActionOutcome::Abandoned,
        }
    }

    /// Rename a file or folder without prompting.
    pub async fn rename(&self, old_key: &str, new_name: &str, is_folder: bool) -> ActionOutcome {
        let refresh = FollowUp::Refresh(self.ctx.timing().refresh_after_change());
        let flow = if is_folder {
            Flow::new("✓ 文件夹重命名成功！", "✗ 重命名失败")
                .progress(format!("正在重命名文件夹: {old_key}..."))
        } else {
            Flow::new("✓ 文件重命名成功！", "✗ 重命名失败")
                .progress(format!("正在重命名: {old_key}..."))
        }
        .then(refresh);

        self.perform(RemoteOperation::rename(old_key, new_name, is_folder), flow)
            .await
    }

    /// Ask for a destination folder and copy or move `source` into it.
    pub async fn prompt_copy_or_move(
        &self,
        source: &str,
        is_folder: bool,
        kind: TransferKind,
    ) -> ActionOutcome {
        let item = if is_folder { "文件夹" } else { "文件" };
        let options =
            PromptOptions::titled(format!("{}{item}", kind.label())).with_confirm_label(kind.label());
        let dest = self.ctx.dialog().show_prompt("请输入目标目录路径：", options).await;

        match dest {
            Some(dest) => {
                let destination = copy_destination(source, &dest, is_folder);
                self.transfer(kind, source, &destination, is_folder).await
            }
            None => ActionOutcome::Abandoned,
        }
    }

    /// Copy or move to a full destination key without prompting.
    pub async fn transfer(
        &self,
        kind: TransferKind,
        source: &str,
        destination: &str,
        is_folder: bool,
    ) -> ActionOutcome {
        let label = kind.label();
        let flow = Flow::new(format!("✓ {label}成功！"), format!("✗ {label}失败"))
            .progress(format!("正在{label}..."))
            .then(FollowUp::Refresh(self.ctx.timing().refresh_after_change()));

        let operation = kind.operation(source.to_string(), destination.to_string(), is_folder);
        self.perform(operation, flow).await
    }

    /// Ask for a folder name and create it under `prefix`.
    pub async fn prompt_create_folder(&self, prefix: &str) -> ActionOutcome {
        let options = PromptOptions::titled("新建文件夹").with_confirm_label("创建");
        let name = self
            .ctx
            .dialog()
            .show_prompt("请输入新文件夹的名称：", options)
            .await;

        match name {
            Some(name) => self.create_folder(&join_prefix(prefix, &name)).await,
            None => ActionOutcome::Abandoned,
        }
    }

    /// Create a folder at a full path.
    pub async fn create_folder(&self, path: &str) -> ActionOutcome {
        let flow = Flow::new("✓ 文件夹创建成功！", "✗ 创建失败")
            .progress(format!("正在创建文件夹: {path}..."))
            .then(FollowUp::Refresh(self.ctx.timing().refresh_after_change()));

        let operation = RemoteOperation::CreateFolder {
            path: path.to_string(),
        };
        self.perform(operation, flow).await
    }

    /// Download a link into `dest_dir`.
    pub async fn download_url(
        &self,
        url: &str,
        file_name: Option<String>,
        dest_dir: &Path,
    ) -> ActionOutcome {
        match DownloadRequest::from_url(url, file_name) {
            Ok(request) => self.download(request, dest_dir).await,
            Err(e) => {
                self.ctx.status().update(e.user_message(), StatusLevel::Error);
                ActionOutcome::Failed
            }
        }
    }

    /// Download into `dest_dir`.
    pub async fn download(&self, request: DownloadRequest, dest_dir: &Path) -> ActionOutcome {
        let status = self.ctx.status();
        let name = request.file_name().unwrap_or_default().to_string();
        status.show_transient(
            format!("✓ 开始下载: {name}"),
            StatusLevel::Success,
            self.ctx.timing().status_hide(),
        );

        match self.ctx.api().download(request, dest_dir).await {
            Ok(path) => {
                self.ctx
                    .events()
                    .emit(ControllerEvent::DownloadSaved { path });
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "Download failed");
                status.update(format!("✗ 下载失败: {}", e.user_message()), StatusLevel::Error);
                ActionOutcome::Failed
            }
        }
    }

    async fn perform(&self, operation: RemoteOperation, flow: Flow) -> ActionOutcome {
        let status = self.ctx.status();
        let kind = operation.operation_type();
        let subject = operation.subject().to_string();

        if !flow.quiet {
            if let Some(progress) = flow.progress {
                status.update(progress, StatusLevel::Neutral);
            }
        }

        match self.ctx.api().execute(operation).await {
            Ok(()) => {
                debug!(%kind, %subject, "Operation succeeded");
                if !flow.quiet {
                    status.show_transient(
                        flow.success,
                        StatusLevel::Success,
                        self.ctx.timing().status_hide(),
                    );
                }
                match flow.follow_up {
                    FollowUp::Nothing => {}
                    FollowUp::Refresh(after) => self.ctx.schedule_refresh(after),
                    FollowUp::Navigate { to, after } => self
                        .ctx
                        .events()
                        .emit(ControllerEvent::NavigateScheduled { to, after }),
                }
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!(%kind, %subject, error = %e, "Operation failed");
                if !flow.quiet {
                    status.update(
                        format!("{}: {}", flow.failure, e.user_message()),
                        StatusLevel::Error,
                    );
                }
                ActionOutcome::Failed
            }
        }
    }
}
