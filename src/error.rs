//! Error types for the index push pipeline.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors raised while turning records into batches.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record without document identifier")]
    MissingDocumentId,

    #[error("missing embedding in record for document {doc_id}")]
    MissingEmbedding { doc_id: String },

    #[error("unexpected embedding type for document {doc_id}: {found}")]
    InvalidEmbeddingType { doc_id: String, found: &'static str },
}

/// Errors related to a single upsert request.
#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("could not reach index service: {0}")]
    Transport(String),

    #[error("index service returned status {status}: {body}")]
    Protocol { status: u16, body: String },

    #[error("invalid response from index service: {0}")]
    InvalidResponse(String),

    #[error("could not encode upsert request: {0}")]
    Encode(String),
}

impl Retryable for UpsertError {
    fn is_retryable(&self) -> bool {
        match self {
            // Connection failures, timeouts and non-2xx answers may be transient
            UpsertError::Transport(_) | UpsertError::Protocol { .. } => true,
            // The service already accepted the request, or it never left the process
            UpsertError::InvalidResponse(_) | UpsertError::Encode(_) => false,
        }
    }
}

impl From<reqwest::Error> for UpsertError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return UpsertError::Protocol {
                status: status.as_u16(),
                body: e.to_string(),
            };
        }
        if e.is_builder() {
            return UpsertError::Encode(e.to_string());
        }
        UpsertError::Transport(e.to_string())
    }
}

/// Errors related to reading the record source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("could not read source: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error at row {row}: {message}")]
    ParseError { row: usize, message: String },

    /// A JSON array document that does not parse; the error carries line and column.
    #[error("JSON parse error: {0}")]
    InvalidJson(serde_json::Error),

    #[error("row {row} is not an object")]
    InvalidRow { row: usize },
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors that abort a push run.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("no valid batches built from {records} records")]
    NoBatches { records: usize },

    #[error(
        "upsert failed for doc={doc_id} namespace={namespace} after {attempts} attempts: {source}"
    )]
    Upsert {
        doc_id: String,
        namespace: String,
        attempts: u32,
        #[source]
        source: UpsertError,
    },
}
