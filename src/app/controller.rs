use crate::upload::{
    Field, FileHandle, FormFields, Notification, PreviewRef, PreviewRegistry, SelectedFile,
    Severity, UploadDispatcher, UploadError, UploadEvent, UploadJob, UploadReceipt,
    UploadRequest, UploadStatus,
};
use derivative::Derivative;
use futures::future::AbortHandle;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

pub const CANCELLED_MESSAGE: &str = "Upload Cancelled";
pub const BUSY_MESSAGE: &str = "Files can be added once the current upload finishes";

struct InFlight {
    abort: AbortHandle,
    events: Receiver<UploadEvent>,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploadController {
    fields: FormFields,
    files: Vec<SelectedFile>,
    status: UploadStatus,
    progress: u8,
    notification: Option<Notification>,
    notification_raised: Option<Instant>,
    previews: PreviewRegistry,
    #[derivative(Debug = "ignore")]
    in_flight: Option<InFlight>,
    #[derivative(Debug = "ignore")]
    dispatcher: Box<dyn UploadDispatcher>,
}

impl UploadController {
    pub fn new(dispatcher: Box<dyn UploadDispatcher>) -> Self {
        Self {
            fields: FormFields::default(),
            files: Vec::new(),
            status: UploadStatus::Idle,
            progress: 0,
            notification: None,
            notification_raised: None,
            previews: PreviewRegistry::default(),
            in_flight: None,
            dispatcher,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    #[cfg(test)]
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    pub fn preview_path(&self, preview: PreviewRef) -> Option<&Path> {
        self.previews.resolve(preview)
    }

    pub fn edit_field(&mut self, field: Field, value: String) {
        self.fields.set(field, value);
    }

    pub fn add_files(&mut self, new_files: Vec<FileHandle>) {
        if self.is_uploading() {
            tracing::warn!(count = new_files.len(), "files offered during an upload were not added");
            self.notify(Notification::new(BUSY_MESSAGE, Severity::Info));
            return;
        }
        tracing::debug!(count = new_files.len(), "adding files");
        for handle in new_files {
            let preview = self.previews.acquire(&handle.path);
            self.files.push(SelectedFile { handle, preview });
        }
    }

    // Only the first entry with a matching name goes; later duplicates stay.
    pub fn remove_file(&mut self, name: &str) {
        if let Some(index) = self.files.iter().position(|f| f.name() == name) {
            self.remove_file_at(index);
        }
    }

    pub fn remove_file_at(&mut self, index: usize) {
        if self.is_uploading() {
            tracing::warn!(index, "file list is locked while an upload is running");
            return;
        }
        if index < self.files.len() {
            let removed = self.files.remove(index);
            self.previews.release(removed.preview);
        }
    }

    pub fn clear_files(&mut self) {
        if self.is_uploading() {
            tracing::warn!("file list is locked while an upload is running");
            return;
        }
        self.release_files();
    }

    pub fn can_submit(&self) -> bool {
        !self.files.is_empty() && self.fields.is_complete() && !self.is_uploading()
    }

    pub fn start_upload(&mut self) -> bool {
        if !self.can_submit() {
            tracing::warn!(
                files = self.files.len(),
                status = ?self.status,
                "upload refused: form is incomplete or an upload is running"
            );
            return false;
        }

        let request = UploadRequest {
            user_name: self.fields.user_name.clone(),
            description: self.fields.description.clone(),
            files: self.files.iter().map(|f| f.handle.clone()).collect(),
        };
        tracing::info!(files = request.files.len(), "starting upload");

        let (abort, registration) = AbortHandle::new_pair();
        let (sender, receiver) = mpsc::channel();
        self.in_flight = Some(InFlight {
            abort,
            events: receiver,
        });
        self.status = UploadStatus::Uploading;
        self.progress = 0;

        self.dispatcher.dispatch(UploadJob {
            request,
            registration,
            events: sender,
        });
        true
    }

    /// Aborts the running upload and leaves the Uploading state at once,
    /// without waiting for the transport to acknowledge the abort.
    pub fn cancel_upload(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        in_flight.abort.abort();
        tracing::info!("upload cancelled by user");
        self.settle_cancelled();
    }

    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;

        while let Some(in_flight) = &self.in_flight {
            let event = match in_flight.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("upload worker went away without reporting a result");
                    self.in_flight = None;
                    self.settle_failed(Notification::new(
                        "Upload failed: worker stopped unexpectedly",
                        Severity::Error,
                    ));
                    changed = true;
                    break;
                }
            };

            changed = true;
            match event {
                UploadEvent::Progress(percent) => {
                    self.progress = self.progress.max(percent.min(100));
                }
                UploadEvent::Finished(result) => {
                    self.in_flight = None;
                    self.settle(result);
                }
            }
        }

        changed
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.notification_raised = None;
        if self.status.is_terminal() {
            self.status = UploadStatus::Idle;
        }
    }

    pub fn dismiss_expired(&mut self, timeout: Duration) -> bool {
        match self.notification_raised {
            Some(raised) if raised.elapsed() >= timeout => {
                self.dismiss_notification();
                true
            }
            _ => false,
        }
    }

    fn settle(&mut self, result: Result<UploadReceipt, UploadError>) {
        match result {
            Ok(receipt) => {
                self.release_files();
                self.fields.clear();
                self.status = UploadStatus::Succeeded;
                self.progress = 0;
                self.notify(Notification::new(receipt.message, Severity::Success));
            }
            Err(e) if e.is_cancelled() => self.settle_cancelled(),
            Err(UploadError::Rejected {
                status,
                error,
                message,
            }) => {
                tracing::warn!(status, %error, "server rejected upload");
                self.settle_failed(Notification::new(message, Severity::Error));
            }
            Err(e) => {
                tracing::warn!("upload failed: {}", e);
                self.settle_failed(Notification::new(e.to_string(), Severity::Error));
            }
        }
    }

    fn settle_cancelled(&mut self) {
        self.release_files();
        self.status = UploadStatus::Cancelled;
        self.progress = 0;
        self.notify(Notification::new(CANCELLED_MESSAGE, Severity::Info));
    }

    fn settle_failed(&mut self, notification: Notification) {
        self.status = UploadStatus::Failed;
        self.progress = 0;
        self.notify(notification);
    }

    fn release_files(&mut self) {
        for file in self.files.drain(..) {
            self.previews.release(file.preview);
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.notification_raised = Some(Instant::now());
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
