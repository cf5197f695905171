//! Document id and namespace resolution, and grouping of rows per document.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::models::{FieldValue, Record};
use crate::services::normalizer::{normalize_meta_value, stringify};
use crate::utils::short_digest;

/// Fields tried, in order, as the document identifier.
pub const DOC_ID_FIELDS: [&str; 3] = ["doc_id", "path", "id"];

/// Rows that belong to one `(namespace, doc_id)` pair, in input order.
#[derive(Debug, Clone)]
pub struct DocumentGroup<'a> {
    pub namespace: String,
    pub doc_id: String,
    pub records: Vec<&'a Record>,
}

/// Derive the document identifier of a row.
///
/// The first present candidate among [`DOC_ID_FIELDS`] wins. Without one,
/// the id is `doc#<digest>` of the row's text, or of the whole row when it
/// has no text either.
pub fn derive_doc_id(record: &Record) -> Result<String, RecordError> {
    for key in DOC_ID_FIELDS {
        let Some(value) = record.present(key) else {
            continue;
        };
        let candidate = match value {
            FieldValue::Text(s) => s.trim().to_string(),
            other => match stringify(other) {
                Some(s) => s,
                None => continue,
            },
        };
        if !candidate.is_empty() {
            return Ok(candidate);
        }
    }

    if let Some(text) = record.present("text").and_then(stringify) {
        return Ok(format!("doc#{}", short_digest(&text)));
    }

    record_digest(record)
        .map(|digest| format!("doc#{digest}"))
        .ok_or(RecordError::MissingDocumentId)
}

/// Resolve the namespace of a row, falling back to `default_namespace`.
pub fn resolve_namespace(record: &Record, default_namespace: &str) -> String {
    record
        .present("namespace")
        .and_then(stringify)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_namespace.to_string())
}

/// Partition rows by `(namespace, doc_id)`.
///
/// Groups are returned in order of first occurrence and keep their rows in
/// input order.
pub fn group_records<'a>(
    records: &'a [Record],
    default_namespace: &str,
) -> Result<Vec<DocumentGroup<'a>>, RecordError> {
    let mut groups: Vec<DocumentGroup<'a>> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for record in records {
        let doc_id = derive_doc_id(record)?;
        let namespace = resolve_namespace(record, default_namespace);

        let slot = *index
            .entry((namespace.clone(), doc_id.clone()))
            .or_insert_with(|| {
                groups.push(DocumentGroup {
                    namespace,
                    doc_id,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
        groups[slot].records.push(record);
    }

    Ok(groups)
}

/// Digest over every present field of the row, keys sorted.
fn record_digest(record: &Record) -> Option<String> {
    let canonical: Map<String, Value> = record
        .fields()
        .filter(|(key, _)| record.present(key).is_some())
        .map(|(key, value)| (key.to_string(), normalize_meta_value(value)))
        .collect();

    if canonical.is_empty() {
        return None;
    }
    Some(short_digest(&Value::Object(canonical).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_doc_id_derivation_order_and_missing() {
        let record = Record::new().with("doc_id", text("  abc  ")).with("id", text("x"));
        assert_eq!(derive_doc_id(&record).unwrap(), "abc");

        let record = Record::new().with("path", text(" /notes/n1.md "));
        assert_eq!(derive_doc_id(&record).unwrap(), "/notes/n1.md");

        let record = Record::new().with("id", text("xyz"));
        assert_eq!(derive_doc_id(&record).unwrap(), "xyz");

        let record = Record::new()
            .with("doc_id", FieldValue::Null)
            .with("path", text("  "))
            .with("id", FieldValue::Float(f64::NAN));
        assert!(matches!(
            derive_doc_id(&record),
            Err(RecordError::MissingDocumentId)
        ));
    }

    #[test]
    fn test_doc_id_non_string_candidates_are_stringified() {
        let record = Record::new()
            .with("doc_id", FieldValue::NotAvailable)
            .with("id", FieldValue::Int(17));
        assert_eq!(derive_doc_id(&record).unwrap(), "17");

        let record = Record::new().with("path", FieldValue::Path("/a/b.md".into()));
        assert_eq!(derive_doc_id(&record).unwrap(), "/a/b.md");
    }

    #[test]
    fn test_float_and_bool_ids_keep_exported_form() {
        // Integer columns with gaps arrive as floats
        let record = Record::new().with("doc_id", FieldValue::Float(17.0));
        assert_eq!(derive_doc_id(&record).unwrap(), "17.0");

        let record = Record::new().with("id", FieldValue::Float(2.5));
        assert_eq!(derive_doc_id(&record).unwrap(), "2.5");

        let record = Record::new().with("doc_id", FieldValue::Bool(true));
        assert_eq!(derive_doc_id(&record).unwrap(), "True");

        let record = Record::new().with("namespace", FieldValue::Float(3.0));
        assert_eq!(resolve_namespace(&record, "vault"), "3.0");

        let record = Record::new().with("namespace", FieldValue::Bool(false));
        assert_eq!(resolve_namespace(&record, "vault"), "False");
    }

    #[test]
    fn test_doc_id_falls_back_to_text_digest() {
        let record = Record::new().with("text", text("hello"));
        let doc_id = derive_doc_id(&record).unwrap();
        assert_eq!(doc_id, format!("doc#{}", short_digest("hello")));
    }

    #[test]
    fn test_doc_id_falls_back_to_whole_record_digest() {
        let a = Record::new()
            .with("embedding", FieldValue::Vector(vec![1.0]))
            .with("source", text("x"));
        let b = Record::new()
            .with("source", text("x"))
            .with("embedding", FieldValue::Vector(vec![1.0]))
            .with("namespace", FieldValue::Null);

        let id_a = derive_doc_id(&a).unwrap();
        assert!(id_a.starts_with("doc#"));
        // Missing fields and insertion order do not influence the digest
        assert_eq!(id_a, derive_doc_id(&b).unwrap());
    }

    #[test]
    fn test_namespace_defaulting() {
        let default_ns = "vault-default";
        for value in [
            None,
            Some(FieldValue::Null),
            Some(text("")),
            Some(text("   ")),
            Some(FieldValue::Float(f64::NAN)),
            Some(FieldValue::NotAvailable),
        ] {
            let mut record = Record::new();
            if let Some(v) = value {
                record.insert("namespace", v);
            }
            assert_eq!(resolve_namespace(&record, default_ns), default_ns);
        }

        let record = Record::new().with("namespace", text("  notes "));
        assert_eq!(resolve_namespace(&record, default_ns), "notes");
    }

    #[test]
    fn test_namespace_fallback_and_grouping() {
        let records = vec![
            Record::new()
                .with("doc_id", text("d1"))
                .with("namespace", text("vault")),
            Record::new()
                .with("doc_id", text("d1"))
                .with("namespace", FieldValue::Float(f64::NAN)),
            Record::new()
                .with("doc_id", text("d2"))
                .with("namespace", text("   ")),
            Record::new()
                .with("doc_id", text("d1"))
                .with("namespace", text("vault")),
        ];

        let groups = group_records(&records, "defaultNS").unwrap();
        let keys: Vec<(&str, &str, usize)> = groups
            .iter()
            .map(|g| (g.namespace.as_str(), g.doc_id.as_str(), g.records.len()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("vault", "d1", 2),
                ("defaultNS", "d1", 1),
                ("defaultNS", "d2", 1),
            ]
        );
        // Rows keep input order inside their group
        assert!(std::ptr::eq(groups[0].records[0], &records[0]));
        assert!(std::ptr::eq(groups[0].records[1], &records[3]));
    }

    #[test]
    fn test_grouping_fails_on_unidentifiable_row() {
        let records = vec![
            Record::new().with("doc_id", text("ok")),
            Record::new().with("doc_id", FieldValue::Null),
        ];
        assert!(matches!(
            group_records(&records, "ns"),
            Err(RecordError::MissingDocumentId)
        ));
    }
}
