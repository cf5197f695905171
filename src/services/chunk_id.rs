//! Stable chunk identifiers within a document.

use std::collections::{BTreeMap, HashSet};

use crate::models::{Chunk, FieldValue, Record};
use crate::services::normalizer::stringify;
use crate::utils::short_digest;

/// Fields tried, in order, as the chunk identifier.
pub const CHUNK_ID_FIELDS: [&str; 5] = ["chunk_id", "id", "chunk_index", "i", "offset"];

/// Row-position hint used when a row has neither an id nor text.
pub const ROW_HINT_FIELD: &str = "__row";

/// Separator between a base id and its collision counter.
pub const COLLISION_SEPARATOR: char = '~';

/// Derive the identifier of one row within document `doc_id`.
///
/// Rows sharing a document may derive the same id (e.g. identical text);
/// [`disambiguate_chunk_ids`] resolves those afterwards.
pub fn derive_chunk_id(record: &Record, doc_id: &str) -> String {
    for key in CHUNK_ID_FIELDS {
        let Some(value) = record.present(key) else {
            continue;
        };
        if let Some(id) = candidate_id(value, doc_id) {
            return id;
        }
    }

    if let Some(text) = record.present("text").and_then(stringify) {
        return format!("{doc_id}#t{}", short_digest(&text));
    }

    if let Some(hint) = record.present(ROW_HINT_FIELD).and_then(integer_suffix) {
        return format!("{doc_id}#r{hint}");
    }

    format!("{doc_id}#chunk")
}

fn candidate_id(value: &FieldValue, doc_id: &str) -> Option<String> {
    match value {
        FieldValue::Text(s) => {
            let s = s.trim();
            // Already qualified, by this document or another
            if s.contains('#') {
                Some(s.to_string())
            } else {
                Some(format!("{doc_id}#{s}"))
            }
        }
        // true/false must never turn into #1/#0
        FieldValue::Bool(_) => None,
        FieldValue::Int(_) | FieldValue::Float(_) => {
            integer_suffix(value).map(|n| format!("{doc_id}#{n}"))
        }
        other => stringify(other).map(|s| format!("{doc_id}#{s}")),
    }
}

/// Integer form of a numeric or numeric-text value; floats truncate toward zero.
pub(crate) fn integer_suffix(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(n) => Some(*n),
        FieldValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        FieldValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Make chunk ids unique within one document.
///
/// Chunks sharing a base id are ranked by content (text, then metadata),
/// input position breaking exact ties. The first keeps the base id, the
/// others get `~2`, `~3`, ... skipping any id already present in the
/// document. Ranking by content keeps the assignment independent of the
/// input row order. Chunk order in `chunks` is left untouched.
pub fn disambiguate_chunk_ids(chunks: &mut [Chunk]) {
    let mut by_base: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (pos, chunk) in chunks.iter().enumerate() {
        by_base.entry(chunk.id.clone()).or_default().push(pos);
    }

    let mut used: HashSet<String> = by_base.keys().cloned().collect();

    for (base, mut positions) in by_base {
        if positions.len() < 2 {
            continue;
        }
        positions.sort_by_cached_key(|&pos| (content_key(&chunks[pos]), pos));

        let mut counter = 1u64;
        for &pos in &positions[1..] {
            let candidate = loop {
                counter += 1;
                let candidate = format!("{base}{COLLISION_SEPARATOR}{counter}");
                if !used.contains(&candidate) {
                    break candidate;
                }
            };
            used.insert(candidate.clone());
            chunks[pos].id = candidate;
        }
    }
}

fn content_key(chunk: &Chunk) -> (String, String) {
    let meta = serde_json::Value::Object(chunk.meta.clone()).to_string();
    (chunk.text.clone(), meta)
}
