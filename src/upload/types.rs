use crate::upload::error::UploadError;
use crate::upload::preview::PreviewRef;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserName,
    Description,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub user_name: String,
    pub description: String,
}

impl FormFields {
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::UserName => self.user_name = value,
            Field::Description => self.description = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.user_name.is_empty() && !self.description.is_empty()
    }

    pub fn clear(&mut self) {
        self.user_name.clear();
        self.description.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self { path, name, size }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::new(path, metadata.len()))
    }
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub handle: FileHandle,
    pub preview: PreviewRef,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.handle.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
    Cancelled,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_name: String,
    pub description: String,
    pub files: Vec<FileHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
}

#[derive(Debug)]
pub enum UploadEvent {
    Progress(u8),
    Finished(Result<UploadReceipt, UploadError>),
}
