use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload Cancelled")]
    Cancelled,

    #[error("{message}")]
    Rejected {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Upload failed with status {status}")]
    MalformedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read {name}: {source}")]
    ReadFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
