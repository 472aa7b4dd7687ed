mod common;

use std::time::Duration;

use bucketdeck_core::OperationTarget;
use bucketdeck_dialog::{DialogEvent, DialogKey};
use bucketdeck_ops::{
    BatchOperation, BatchRunner, ControlId, ControllerEvent, OperationType, StatusLevel,
};

use common::{FakeStorage, Harness, answer, wait_open};

fn files(paths: &[&str]) -> Vec<OperationTarget> {
    paths.iter().map(|p| OperationTarget::file(*p)).collect()
}

fn control(enabled: bool) -> ControllerEvent {
    ControllerEvent::ControlEnabled {
        control: ControlId::DeleteSelected,
        enabled,
    }
}

#[tokio::test]
async fn test_partial_failure_reports_failed_paths() {
    let mut h = Harness::new(FakeStorage::new().failing("docs/b.txt", "locked"));

    let (job, ()) = tokio::join!(
        h.actions.delete_selected(files(&["docs/a.txt", "docs/b.txt"])),
        answer(&h.dialog, DialogEvent::Confirm)
    );
    let job = job.unwrap();

    assert_eq!(h.api.subjects(), vec!["docs/a.txt", "docs/b.txt"]);
    assert_eq!(job.succeeded, files(&["docs/a.txt"]));
    assert_eq!(job.failed.len(), 1);
    assert_eq!(job.failed[0].target.path, "docs/b.txt");
    assert_eq!(job.failed[0].error, "locked");
    assert!(job.is_complete());

    let current = h.status.current().unwrap();
    assert_eq!(current.text, "删除部分文件失败：docs/b.txt");
    assert_eq!(current.level, StatusLevel::Error);

    assert_eq!(
        h.drain_events(),
        vec![
            control(false),
            control(true),
            ControllerEvent::RefreshScheduled {
                after: Duration::from_millis(1500)
            },
            ControllerEvent::BatchFinished {
                operation: OperationType::Delete,
                succeeded: 1,
                failed: 1
            },
        ]
    );
}

#[tokio::test]
async fn test_directory_in_selection_sends_nothing() {
    let mut h = Harness::new(FakeStorage::new());
    let targets = vec![
        OperationTarget::file("a.txt"),
        OperationTarget::dir("photos/"),
    ];

    let job = h.actions.delete_selected(targets).await;

    assert!(job.is_none());
    assert!(h.api.calls().is_empty());
    assert!(!h.dialog.is_open());
    assert_eq!(
        h.status.current().unwrap().text,
        "✗ 暂不支持批量删除文件夹，请仅选择文件"
    );
    assert!(h.drain_events().is_empty());
}

#[tokio::test]
async fn test_empty_selection_is_rejected() {
    let h = Harness::new(FakeStorage::new());

    assert!(h.actions.delete_selected(Vec::new()).await.is_none());
    assert!(h.api.calls().is_empty());
    assert_eq!(h.status.current().unwrap().text, "✗ 请先选择要删除的项目");
}

#[tokio::test]
async fn test_all_succeed_in_order_with_single_progress_status() {
    let mut h = Harness::new(FakeStorage::new());

    let (job, ()) = tokio::join!(
        h.actions.delete_selected(files(&["c.txt", "a.txt", "b.txt"])),
        answer(&h.dialog, DialogEvent::Confirm)
    );

    assert!(job.unwrap().is_success());
    assert_eq!(h.api.subjects(), vec!["c.txt", "a.txt", "b.txt"]);

    // Per-file statuses are suppressed.
    assert_eq!(
        h.status_texts(),
        vec!["正在删除 3 个文件...", "✓ 已删除 3 个文件"]
    );
    assert_eq!(h.status.current().unwrap().level, StatusLevel::Success);
    assert!(h.drain_events().contains(&ControllerEvent::RefreshScheduled {
        after: Duration::from_millis(1500)
    }));
}

#[tokio::test]
async fn test_all_fail_skips_refresh() {
    let mut h = Harness::new(
        FakeStorage::new()
            .failing("a.txt", "locked")
            .failing("b.txt", "locked"),
    );

    let (job, ()) = tokio::join!(
        h.actions.delete_selected(files(&["a.txt", "b.txt"])),
        answer(&h.dialog, DialogEvent::Confirm)
    );

    assert_eq!(job.unwrap().failed.len(), 2);
    assert_eq!(h.status.current().unwrap().text, "✗ 删除失败，请稍后重试");

    let events = h.drain_events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ControllerEvent::RefreshScheduled { .. }))
    );
    assert_eq!(events.last(), Some(&ControllerEvent::BatchFinished {
        operation: OperationType::Delete,
        succeeded: 0,
        failed: 2
    }));
}

#[tokio::test]
async fn test_escape_abandons_without_requests() {
    let mut h = Harness::new(FakeStorage::new());

    let (job, ()) = tokio::join!(
        h.actions.delete_selected(files(&["a.txt", "b.txt"])),
        answer(&h.dialog, DialogEvent::Key(DialogKey::Escape))
    );

    assert!(job.is_none());
    assert!(h.api.calls().is_empty());
    assert!(h.status.current().is_none());
    assert!(h.drain_events().is_empty());
}

#[tokio::test]
async fn test_confirmation_wording() {
    let h = Harness::new(FakeStorage::new());

    let driver = async {
        wait_open(&h.dialog).await;
        let view = h.dialog.snapshot().view.unwrap();
        assert_eq!(view.title.as_deref(), Some("批量删除"));
        assert_eq!(view.message, "确定要删除 \"docs/a.txt\" 吗？");
        assert_eq!(view.confirm_label, "删除");
        h.dialog.handle_event(DialogEvent::Cancel);
    };
    let (job, ()) = tokio::join!(h.actions.delete_selected(files(&["docs/a.txt"])), driver);
    assert!(job.is_none());

    let driver = async {
        wait_open(&h.dialog).await;
        let view = h.dialog.snapshot().view.unwrap();
        assert_eq!(view.message, "确定要删除选中的 2 个文件吗？");
        h.dialog.handle_event(DialogEvent::Cancel);
    };
    let (job, ()) = tokio::join!(h.actions.delete_selected(files(&["a", "b"])), driver);
    assert!(job.is_none());
}

#[tokio::test]
async fn test_trigger_reenabled_when_batch_is_dropped() {
    let mut h = Harness::new(FakeStorage::new().stalling("b.txt"));
    let runner = BatchRunner::new(h.context());

    let run = async {
        tokio::time::timeout(
            Duration::from_millis(50),
            runner.run_batch(files(&["a.txt", "b.txt"]), BatchOperation::Delete),
        )
        .await
    };
    let (result, ()) = tokio::join!(run, answer(&h.dialog, DialogEvent::Confirm));

    assert!(result.is_err());
    assert_eq!(h.api.subjects(), vec!["a.txt", "b.txt"]);
    assert_eq!(h.drain_events(), vec![control(false), control(true)]);
}
