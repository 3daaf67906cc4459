use crate::upload::client::UploadClient;
use crate::upload::error::UploadError;
use crate::upload::types::{UploadEvent, UploadRequest};
use futures::future::{AbortRegistration, Abortable};
use std::sync::mpsc::Sender;
use tokio::runtime::Runtime;

pub struct UploadJob {
    pub request: UploadRequest,
    pub registration: AbortRegistration,
    pub events: Sender<UploadEvent>,
}

pub trait UploadDispatcher {
    fn dispatch(&self, job: UploadJob);
}

pub struct RuntimeDispatcher {
    runtime: Runtime,
    client: UploadClient,
}

impl RuntimeDispatcher {
    pub fn new(client: UploadClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("upload-worker")
            .enable_all()
            .build()?;
        Ok(Self { runtime, client })
    }
}

impl UploadDispatcher for RuntimeDispatcher {
    fn dispatch(&self, job: UploadJob) {
        let client = self.client.clone();
        let UploadJob {
            request,
            registration,
            events,
        } = job;

        self.runtime.spawn(async move {
            let upload = client.upload(request, events.clone());
            let result = match Abortable::new(upload, registration).await {
                Ok(result) => result,
                Err(_aborted) => Err(UploadError::Cancelled),
            };

            match &result {
                Ok(receipt) => tracing::info!(message = %receipt.message, "upload finished"),
                Err(e) if e.is_cancelled() => tracing::info!("upload aborted"),
                Err(e) => tracing::warn!("upload failed: {}", e),
            }
            // The controller drops its receiver on cancel; nothing to do then.
            let _ = events.send(UploadEvent::Finished(result));
        });
    }
}
