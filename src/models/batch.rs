//! Upsert payload types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Smallest addressable unit of a document on the index service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    /// Always carries `embedding`; other keys are normalized record fields.
    pub meta: Map<String, Value>,
}

/// One namespace/document pair and its chunks, sent as a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub namespace: String,
    pub doc_id: String,
    pub chunks: Vec<Chunk>,
}

impl Batch {
    pub fn new(namespace: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            doc_id: doc_id.into(),
            chunks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk_ids(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|c| c.id.as_str())
    }
}

/// Result of a request the index service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The service's `status` field, if it sent one.
    pub status: Option<String>,
    pub attempts: u32,
}
