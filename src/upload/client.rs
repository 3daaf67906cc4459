use crate::upload::error::UploadError;
use crate::upload::progress::ProgressTracker;
use crate::upload::types::{FileHandle, UploadEvent, UploadReceipt, UploadRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;
const FALLBACK_SUCCESS_MESSAGE: &str = "Upload complete";

#[derive(Deserialize)]
struct SuccessBody {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    pub async fn upload(
        &self,
        request: UploadRequest,
        events: Sender<UploadEvent>,
    ) -> Result<UploadReceipt, UploadError> {
        let opened = open_files(&request.files).await?;
        let total: u64 = opened.iter().map(|file| file.length).sum();
        let tracker = ProgressTracker::new(total, events);

        let mut form = Form::new()
            .text("userName", request.user_name)
            .text("description", request.description);
        for file in opened {
            form = form.part("files", file_part(file, &tracker)?);
        }

        let url = self.upload_url();
        tracing::info!(%url, total_bytes = total, "sending upload");
        let response = self.http.post(&url).multipart(form).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        interpret_response(status, &body)
    }
}

struct OpenedFile {
    handle: FileHandle,
    file: File,
    length: u64,
}

// Opening every file up front surfaces unreadable selections before any byte is sent.
async fn open_files(files: &[FileHandle]) -> Result<Vec<OpenedFile>, UploadError> {
    let mut opened = Vec::with_capacity(files.len());
    for handle in files {
        let read_error = |source| UploadError::ReadFile {
            name: handle.name.clone(),
            source,
        };
        let file = File::open(&handle.path).await.map_err(read_error)?;
        let length = file.metadata().await.map_err(read_error)?.len();
        opened.push(OpenedFile {
            handle: handle.clone(),
            file,
            length,
        });
    }
    Ok(opened)
}

fn file_part(opened: OpenedFile, tracker: &Arc<ProgressTracker>) -> Result<Part, UploadError> {
    let OpenedFile {
        handle,
        file,
        length,
    } = opened;

    let state = Some((file, Arc::clone(tracker)));
    let stream = futures::stream::unfold(state, |state| async move {
        let (mut file, tracker) = state?;
        let mut chunk = vec![0u8; CHUNK_SIZE];
        match file.read(&mut chunk).await {
            Ok(0) => None,
            Ok(read) => {
                chunk.truncate(read);
                tracker.advance(read);
                Some((Ok(chunk), Some((file, tracker))))
            }
            Err(e) => Some((Err(e), None)),
        }
    });

    let mime = mime_guess::from_path(&handle.path).first_or_octet_stream();
    let part = Part::stream_with_length(Body::wrap_stream(stream), length)
        .file_name(handle.name)
        .mime_str(mime.as_ref())?;
    Ok(part)
}

pub(crate) fn interpret_response(
    status: StatusCode,
    body: &[u8],
) -> Result<UploadReceipt, UploadError> {
    if status == StatusCode::OK {
        let message = match serde_json::from_slice::<SuccessBody>(body) {
            Ok(success) => success.message,
            Err(e) => {
                tracing::warn!("upload succeeded but the response body was unreadable: {}", e);
                FALLBACK_SUCCESS_MESSAGE.to_string()
            }
        };
        return Ok(UploadReceipt { message });
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(rejection) => Err(UploadError::Rejected {
            status: status.as_u16(),
            error: rejection.error,
            message: rejection.message,
        }),
        Err(source) => Err(UploadError::MalformedResponse {
            status: status.as_u16(),
            source,
        }),
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
