// Quill Core Library
// Relays writer tasks to an upstream LLM API and normalizes its replies

pub mod config;
pub mod llm;
pub mod prompts;
pub mod task;

// Export core types
pub use config::{ModelTable, PlatformLimits, UpstreamConfig};
pub use llm::{extract, extract_primary, Dispatcher, HttpTransport, UpstreamTransport};
pub use task::{GenerationRequest, PayloadShape, Task};

// Error types
use thiserror::Error;

const GENERIC_INTERNAL_DETAIL: &str = "An internal server error occurred.";

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Upstream error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, QuillError>;

impl QuillError {
    /// HTTP status a caller should see for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            QuillError::UpstreamError { status, .. } => *status,
            QuillError::TransportError(_) => 503,
            QuillError::ConfigurationError(_)
            | QuillError::ExtractionError(_)
            | QuillError::InternalError(_)
            | QuillError::SerializationError(_) => 500,
        }
    }

    /// Caller-readable message. Internal failures stay generic.
    pub fn detail(&self) -> String {
        match self {
            QuillError::ConfigurationError(_) => {
                "Upstream API key not configured on the server.".to_string()
            }
            QuillError::UpstreamError { message, .. } => message.clone(),
            QuillError::TransportError(msg) => format!("Could not connect to upstream API: {msg}"),
            QuillError::ExtractionError(_) => {
                "Failed to parse content from upstream API response.".to_string()
            }
            QuillError::InternalError(_)
            | QuillError::SerializationError(_) => GENERIC_INTERNAL_DETAIL.to_string(),
        }
    }
}
