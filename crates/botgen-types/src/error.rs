use std::time::Duration;

use thiserror::Error;

/// Client-side validation failures. Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields! (*) missing: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    #[error("Please enter a bot name.")]
    MissingBotName,

    #[error("Please upload voice samples for cloning!")]
    MissingVoiceId,

    #[error("no {0} files attached")]
    NoFiles(&'static str),

    #[error("knowledge base already processed for this session")]
    KnowledgeBaseAlreadyProcessed,

    #[error("unsupported voice sample '{name}': expected one of {allowed}")]
    UnsupportedVoiceSample { name: String, allowed: String },
}

/// Failures talking to the remote bot backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Whether the request was cut off by the client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout(_))
    }
}

/// Errors resolving the backend configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no backend URL configured (set BACKEND_URL or pass --backend-url)")]
    MissingBackendUrl,

    #[error("invalid backend URL '{0}': must start with http:// or https://")]
    InvalidBackendUrl(String),
}

/// Errors loading files to upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} has no file name")]
    NoFileName(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
