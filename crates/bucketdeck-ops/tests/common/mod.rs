#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use bucketdeck_core::{OpsError, TimingConfig};
use bucketdeck_dialog::{DialogController, DialogEvent, DialogKey};
use bucketdeck_ops::{
    ControllerEvent, DownloadRequest, EventSink, FileActions, OperationContext, RemoteOperation,
    StatusReporter, StorageApi,
};

/// In-memory storage API that records every request.
#[derive(Default)]
pub struct FakeStorage {
    calls: Mutex<Vec<RemoteOperation>>,
    /// Subject -> server error text.
    failures: HashMap<String, String>,
    /// Subjects whose request never completes.
    stalls: Vec<String>,
    download_error: Option<String>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, subject: &str, error: &str) -> Self {
        self.failures.insert(subject.to_string(), error.to_string());
        self
    }

    pub fn stalling(mut self, subject: &str) -> Self {
        self.stalls.push(subject.to_string());
        self
    }

    pub fn download_failing(mut self, error: &str) -> Self {
        self.download_error = Some(error.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RemoteOperation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|op| op.subject().to_string())
            .collect()
    }
}

impl StorageApi for FakeStorage {
    async fn execute(&self, operation: RemoteOperation) -> Result<(), OpsError> {
        let subject = operation.subject().to_string();
        self.calls.lock().unwrap().push(operation);

        if self.stalls.contains(&subject) {
            std::future::pending::<()>().await;
        }
        match self.failures.get(&subject) {
            Some(error) => Err(OpsError::application(Some(error.clone()))),
            None => Ok(()),
        }
    }

    async fn download(&self, request: DownloadRequest, dest_dir: &Path) -> Result<PathBuf, OpsError> {
        if let Some(error) = &self.download_error {
            return Err(OpsError::transport(error));
        }
        let path = dest_dir.join(request.file_name().unwrap_or("download"));
        tokio::fs::write(&path, b"contents")
            .await
            .map_err(|e| OpsError::io(&path, e))?;
        Ok(path)
    }
}

pub struct Harness {
    pub api: Arc<FakeStorage>,
    pub dialog: DialogController,
    pub status: StatusReporter,
    pub events: UnboundedReceiver<ControllerEvent>,
    pub actions: FileActions<FakeStorage>,
}

impl Harness {
    pub fn new(api: FakeStorage) -> Self {
        Self::with_timing(api, TimingConfig::default())
    }

    pub fn with_timing(api: FakeStorage, timing: TimingConfig) -> Self {
        let api = Arc::new(api);
        let dialog = DialogController::builder()
            .settle_delay(Duration::ZERO)
            .build();
        let status = StatusReporter::new();
        let (sink, events) = EventSink::channel();
        let ctx = OperationContext::new(
            api.clone(),
            dialog.clone(),
            status.clone(),
            sink,
            timing,
        );

        Self {
            api,
            dialog,
            status,
            events,
            actions: FileActions::new(ctx),
        }
    }

    pub fn context(&self) -> OperationContext<FakeStorage> {
        self.actions.context().clone()
    }

    /// Status texts shown so far, oldest first.
    pub fn status_texts(&self) -> Vec<String> {
        self.status.history().into_iter().map(|m| m.text).collect()
    }

    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub async fn wait_open(dialog: &DialogController) {
    let mut rx = dialog.subscribe();
    rx.wait_for(|snapshot| snapshot.is_open()).await.unwrap();
}

/// Wait for the dialog and answer it.
pub async fn answer(dialog: &DialogController, event: DialogEvent) {
    wait_open(dialog).await;
    dialog.handle_event(event);
}

/// Wait for a prompt, type `text` over the default and press Enter.
pub async fn answer_prompt(dialog: &DialogController, text: &str) {
    wait_open(dialog).await;
    for c in text.chars() {
        dialog.handle_event(DialogEvent::Key(DialogKey::Char(c)));
    }
    dialog.handle_event(DialogEvent::Key(DialogKey::Enter));
}
