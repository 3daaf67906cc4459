mod client;
mod dispatcher;
mod error;
mod file_source;
mod preview;
mod progress;
mod types;

pub use client::UploadClient;
pub use dispatcher::{RuntimeDispatcher, UploadDispatcher, UploadJob};
pub use error::UploadError;
pub use file_source::collect_files;
pub use preview::{PreviewRef, PreviewRegistry};
pub use types::{
    Field, FileHandle, FormFields, Notification, SelectedFile, Severity, UploadEvent,
    UploadReceipt, UploadRequest, UploadStatus,
};
