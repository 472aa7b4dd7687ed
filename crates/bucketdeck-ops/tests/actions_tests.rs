mod common;

use std::time::Duration;

use tempfile::TempDir;

use bucketdeck_core::TimingConfig;
use bucketdeck_dialog::{DialogEvent, DialogKey};
use bucketdeck_ops::{
    ActionOutcome, ControllerEvent, DeleteOptions, DownloadRequest, RemoteOperation, StatusLevel,
    TransferKind, UploadFile,
};

use common::{FakeStorage, Harness, answer, answer_prompt, wait_open};

#[tokio::test]
async fn test_upload_success_schedules_refresh() {
    let mut h = Harness::new(FakeStorage::new());

    let outcome = h
        .actions
        .upload_files(vec![UploadFile::new("a.txt", b"hello".to_vec())], "docs/")
        .await;

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.api.calls(),
        vec![RemoteOperation::Upload {
            file: UploadFile::new("a.txt", b"hello".to_vec()),
            prefix: "docs/".into(),
        }]
    );
    assert_eq!(h.status_texts(), vec!["正在上传: a.txt...", "✓ a.txt 上传成功！"]);
    assert_eq!(
        h.drain_events(),
        vec![ControllerEvent::RefreshScheduled {
            after: Duration::from_millis(2000)
        }]
    );
}

#[tokio::test]
async fn test_upload_failure_keeps_going() {
    let h = Harness::new(FakeStorage::new().failing("a.txt", "bucket full"));

    let outcome = h
        .actions
        .upload_files(
            vec![
                UploadFile::new("a.txt", Vec::new()),
                UploadFile::new("b.txt", Vec::new()),
            ],
            "",
        )
        .await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(h.api.subjects(), vec!["a.txt", "b.txt"]);
    assert!(
        h.status_texts()
            .contains(&"✗ a.txt 上传失败: bucket full".to_string())
    );
    assert_eq!(h.status.current().unwrap().text, "✓ b.txt 上传成功！");
}

#[tokio::test]
async fn test_delete_file_cancelled() {
    let h = Harness::new(FakeStorage::new());

    let (outcome, ()) = tokio::join!(
        h.actions.delete_file("a.txt", DeleteOptions::default()),
        answer(&h.dialog, DialogEvent::Cancel)
    );

    assert_eq!(outcome, ActionOutcome::Abandoned);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_delete_file_quiet() {
    let mut h = Harness::new(FakeStorage::new().failing("b.txt", "locked"));
    let quiet = DeleteOptions {
        skip_confirm: true,
        suppress_reload: true,
        suppress_status: true,
    };

    assert!(h.actions.delete_file("a.txt", quiet).await.is_completed());
    assert_eq!(h.actions.delete_file("b.txt", quiet).await, ActionOutcome::Failed);

    assert!(h.status_texts().is_empty());
    assert!(h.drain_events().is_empty());
}

#[tokio::test]
async fn test_delete_file_error_status() {
    let h = Harness::new(FakeStorage::new().failing("a.txt", "locked"));

    let (outcome, ()) = tokio::join!(
        h.actions.delete_file("a.txt", DeleteOptions::default()),
        answer(&h.dialog, DialogEvent::Confirm)
    );

    assert_eq!(outcome, ActionOutcome::Failed);
    let current = h.status.current().unwrap();
    assert_eq!(current.text, "✗ 删除失败: locked");
    assert_eq!(current.level, StatusLevel::Error);
}

#[tokio::test]
async fn test_delete_file_refresh_uses_delete_delay() {
    let timing = TimingConfig {
        refresh_after_upload_ms: 100,
        refresh_after_delete_ms: 700,
        ..TimingConfig::default()
    };
    let mut h = Harness::with_timing(FakeStorage::new(), timing);
    let skip = DeleteOptions {
        skip_confirm: true,
        ..DeleteOptions::default()
    };

    assert!(h.actions.delete_file("a.txt", skip).await.is_completed());

    assert_eq!(h.status_texts(), vec!["正在删除: a.txt...", "✓ 文件删除成功！"]);
    assert_eq!(
        h.drain_events(),
        vec![ControllerEvent::RefreshScheduled {
            after: Duration::from_millis(700)
        }]
    );
}

#[tokio::test]
async fn test_prompt_delete_uses_entered_path() {
    let h = Harness::new(FakeStorage::new());

    let driver = async {
        answer_prompt(&h.dialog, "folder/file.jpg").await;
        // Second dialog: the per-file confirmation.
        answer(&h.dialog, DialogEvent::Confirm).await;
    };
    let (outcome, ()) = tokio::join!(h.actions.prompt_delete(), driver);

    assert!(outcome.is_completed());
    assert_eq!(h.api.subjects(), vec!["folder/file.jpg"]);
}

#[tokio::test]
async fn test_delete_folder_navigates_to_parent() {
    let mut h = Harness::new(FakeStorage::new());

    let driver = async {
        wait_open(&h.dialog).await;
        let view = h.dialog.snapshot().view.unwrap();
        assert_eq!(view.title.as_deref(), Some("删除文件夹"));
        assert_eq!(view.confirm_label, "确认删除");
        h.dialog.handle_event(DialogEvent::Confirm);
    };
    let (outcome, ()) = tokio::join!(h.actions.delete_folder("docs/old/"), driver);

    assert!(outcome.is_completed());
    assert_eq!(
        h.api.calls(),
        vec![RemoteOperation::DeleteFolder {
            prefix: "docs/old/".into()
        }]
    );
    assert_eq!(h.status.current().unwrap().text, "✓ 文件夹删除成功！");
    assert_eq!(
        h.drain_events(),
        vec![ControllerEvent::NavigateScheduled {
            to: "/docs".into(),
            after: Duration::from_millis(1500)
        }]
    );
}

#[tokio::test]
async fn test_prompt_rename_skips_unchanged_name() {
    let h = Harness::new(FakeStorage::new());

    let (outcome, ()) = tokio::join!(
        h.actions.prompt_rename("docs/a.txt", "a.txt", false),
        answer(&h.dialog, DialogEvent::Confirm)
    );

    assert_eq!(outcome, ActionOutcome::Abandoned);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_prompt_rename_file() {
    let h = Harness::new(FakeStorage::new());

    let (outcome, ()) = tokio::join!(
        h.actions.prompt_rename("docs/a.txt", "a.txt", false),
        answer_prompt(&h.dialog, "b.txt")
    );

    assert!(outcome.is_completed());
    assert_eq!(
        h.api.calls(),
        vec![RemoteOperation::RenameFile {
            old_key: "docs/a.txt".into(),
            new_name: "b.txt".into()
        }]
    );
    assert_eq!(
        h.status_texts(),
        vec!["正在重命名: docs/a.txt...", "✓ 文件重命名成功！"]
    );
}

#[tokio::test]
async fn test_move_folder_builds_full_destination() {
    let h = Harness::new(FakeStorage::new());

    let driver = async {
        wait_open(&h.dialog).await;
        let view = h.dialog.snapshot().view.unwrap();
        assert_eq!(view.title.as_deref(), Some("移动文件夹"));
        for c in "archive".chars() {
            h.dialog.handle_event(DialogEvent::Key(DialogKey::Char(c)));
        }
        h.dialog.handle_event(DialogEvent::Confirm);
    };
    let (outcome, ()) = tokio::join!(
        h.actions
            .prompt_copy_or_move("docs/old/", true, TransferKind::Move),
        driver
    );

    assert!(outcome.is_completed());
    assert_eq!(
        h.api.calls(),
        vec![RemoteOperation::Move {
            source: "docs/old/".into(),
            destination: "archive/old/".into(),
            is_folder: true
        }]
    );
    assert_eq!(h.status_texts(), vec!["正在移动...", "✓ 移动成功！"]);
}

#[tokio::test]
async fn test_copy_failure_status() {
    let h = Harness::new(FakeStorage::new().failing("a.txt", "Destination exists"));

    let outcome = h
        .actions
        .transfer(TransferKind::Copy, "a.txt", "backup/a.txt", false)
        .await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(
        h.status.current().unwrap().text,
        "✗ 复制失败: Destination exists"
    );
}

#[tokio::test]
async fn test_prompt_create_folder_trims_name() {
    let h = Harness::new(FakeStorage::new());

    let (outcome, ()) = tokio::join!(
        h.actions.prompt_create_folder("docs/"),
        answer_prompt(&h.dialog, "  reports  ")
    );

    assert!(outcome.is_completed());
    assert_eq!(
        h.api.calls(),
        vec![RemoteOperation::CreateFolder {
            path: "docs/reports".into()
        }]
    );
    assert_eq!(h.status.current().unwrap().text, "✓ 文件夹创建成功！");
}

#[tokio::test]
async fn test_download_without_link() {
    let h = Harness::new(FakeStorage::new());
    let temp = TempDir::new().unwrap();

    let outcome = h.actions.download_url("", None, temp.path()).await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(h.status.current().unwrap().text, "✗ 无法下载：缺少下载链接");
}

#[tokio::test]
async fn test_download_saves_file() {
    let mut h = Harness::new(FakeStorage::new());
    let temp = TempDir::new().unwrap();

    let outcome = h
        .actions
        .download(DownloadRequest::for_key("docs/a.txt"), temp.path())
        .await;

    assert!(outcome.is_completed());
    assert_eq!(h.status.current().unwrap().text, "✓ 开始下载: a.txt");

    let path = temp.path().join("a.txt");
    assert!(path.exists());
    assert_eq!(
        h.drain_events(),
        vec![ControllerEvent::DownloadSaved { path }]
    );
}

#[tokio::test]
async fn test_download_failure_status() {
    let h = Harness::new(FakeStorage::new().download_failing("connection reset"));
    let temp = TempDir::new().unwrap();

    let outcome = h
        .actions
        .download(DownloadRequest::for_key("a.txt"), temp.path())
        .await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(
        h.status.current().unwrap().text,
        "✗ 下载失败: connection reset"
    );
}
