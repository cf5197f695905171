//! Assembly of document groups into upsert batches.

use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::models::{Batch, Chunk, FieldValue, Record};
use crate::services::chunk_id::{derive_chunk_id, disambiguate_chunk_ids, integer_suffix};
use crate::services::grouper::{DocumentGroup, group_records};
use crate::services::normalizer::{is_missing, normalize_meta_value, stringify};

/// Record fields that are part of the payload itself and never copied into `meta`.
pub const RESERVED_FIELDS: [&str; 5] = ["embedding", "text", "doc_id", "namespace", "id"];

/// Turn all records into one batch per `(namespace, doc_id)`, in order of first occurrence.
pub fn build_batches(records: &[Record], default_namespace: &str) -> Result<Vec<Batch>, RecordError> {
    group_records(records, default_namespace)?
        .into_iter()
        .map(build_batch)
        .collect()
}

/// Build the batch for a single document group.
pub fn build_batch(group: DocumentGroup<'_>) -> Result<Batch, RecordError> {
    let mut chunks = group
        .records
        .iter()
        .map(|record| record_to_chunk(record, &group.doc_id))
        .collect::<Result<Vec<_>, _>>()?;

    disambiguate_chunk_ids(&mut chunks);

    Ok(Batch {
        namespace: group.namespace,
        doc_id: group.doc_id,
        chunks,
    })
}

/// Convert one row into a chunk of document `doc_id`.
pub fn record_to_chunk(record: &Record, doc_id: &str) -> Result<Chunk, RecordError> {
    let id = derive_chunk_id(record, doc_id);
    let text = record.present("text").and_then(stringify).unwrap_or_default();
    let embedding = to_embedding(record.get("embedding"), doc_id)?;

    let mut meta = Map::new();
    meta.insert(
        "embedding".to_string(),
        normalize_meta_value(&FieldValue::Vector(embedding)),
    );

    for (key, value) in record.fields() {
        if RESERVED_FIELDS.contains(&key) || is_missing(value) {
            continue;
        }
        match key {
            "path" => {
                let path = stringify(value).map_or_else(|| normalize_meta_value(value), Value::String);
                meta.insert("source_path".to_string(), path);
            }
            "chunk_id" => {
                // Booleans count as 0/1 here, never in the chunk id itself
                let chunk_id = match value {
                    FieldValue::Bool(b) => Value::from(i64::from(*b)),
                    _ => integer_suffix(value)
                        .map_or_else(|| normalize_meta_value(value), Value::from),
                };
                meta.insert("chunk_id".to_string(), chunk_id);
            }
            _ => {
                meta.insert(key.to_string(), normalize_meta_value(value));
            }
        }
    }

    Ok(Chunk { id, text, meta })
}

/// Extract the embedding vector of a row.
pub fn to_embedding(value: Option<&FieldValue>, doc_id: &str) -> Result<Vec<f64>, RecordError> {
    let invalid = |found: &'static str| RecordError::InvalidEmbeddingType {
        doc_id: doc_id.to_string(),
        found,
    };

    match value {
        None | Some(FieldValue::Null) | Some(FieldValue::NotAvailable) => {
            Err(RecordError::MissingEmbedding {
                doc_id: doc_id.to_string(),
            })
        }
        Some(FieldValue::Vector(v)) => Ok(v.clone()),
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|item| item.as_number().ok_or_else(|| invalid(item.type_name())))
            .collect(),
        Some(other) => Err(invalid(other.type_name())),
    }
}
