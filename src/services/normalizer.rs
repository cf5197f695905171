//! Missing-value classification and metadata normalization.
//!
//! Every other stage asks this module whether a field "exists", so the
//! rules for null, NaN, blank strings and the source's not-available
//! marker live in exactly one place.

use serde_json::{Map, Number, Value};

use crate::models::FieldValue;

/// Returns true for null, NaN, blank text, empty paths and the not-available marker.
pub fn is_missing(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null | FieldValue::NotAvailable => true,
        FieldValue::Float(f) => f.is_nan(),
        FieldValue::Text(s) => s.trim().is_empty(),
        FieldValue::Path(p) => p.as_os_str().is_empty(),
        _ => false,
    }
}

/// Convert a field into a plain JSON value.
///
/// Paths become strings, vectors and lists become arrays, timestamps become
/// RFC 3339 strings. Non-finite floats have no JSON form and become null.
pub fn normalize_meta_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null | FieldValue::NotAvailable => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Int(n) => Value::from(*n),
        FieldValue::Float(f) => float_value(*f),
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Path(p) => Value::String(p.to_string_lossy().into_owned()),
        FieldValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
        FieldValue::Vector(v) => Value::Array(v.iter().copied().map(float_value).collect()),
        FieldValue::List(items) => Value::Array(items.iter().map(normalize_meta_value).collect()),
        FieldValue::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_meta_value(v)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

/// Plain string form of a scalar field, used when a value must become part of an id.
///
/// Text is returned as-is (callers decide about trimming). Booleans and
/// floats render the way the exporting side prints them (`True`, `17.0`,
/// `1e+16`), so ids stay identical to those already in the index.
/// Collections have no stable scalar form and yield `None`.
pub fn stringify(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Null | FieldValue::NotAvailable => None,
        FieldValue::Bool(true) => Some("True".to_string()),
        FieldValue::Bool(false) => Some("False".to_string()),
        FieldValue::Int(n) => Some(n.to_string()),
        FieldValue::Float(f) if !f.is_nan() => Some(float_repr(*f)),
        FieldValue::Float(_) => None,
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Path(p) => Some(p.to_string_lossy().into_owned()),
        FieldValue::Timestamp(ts) => Some(ts.to_rfc3339()),
        FieldValue::Vector(_) | FieldValue::List(_) | FieldValue::Map(_) => None,
    }
}

/// Shortest round-trip form that always keeps a fractional part or an
/// exponent, with a signed two-digit exponent. Infinities print as `inf`.
fn float_repr(f: f64) -> String {
    // Debug switches to exponent notation below 1e-4 and from 1e16 on
    let repr = format!("{f:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn test_is_missing_covers_nan_none_and_whitespace() {
        assert!(is_missing(&FieldValue::Null));
        assert!(is_missing(&FieldValue::NotAvailable));
        assert!(is_missing(&FieldValue::Float(f64::NAN)));
        assert!(is_missing(&FieldValue::Text(String::new())));
        assert!(is_missing(&FieldValue::Text("   \t".to_string())));
        assert!(is_missing(&FieldValue::Path(PathBuf::new())));

        assert!(!is_missing(&FieldValue::Text("x".to_string())));
        assert!(!is_missing(&FieldValue::Int(0)));
        assert!(!is_missing(&FieldValue::Float(0.0)));
        assert!(!is_missing(&FieldValue::Bool(false)));
        assert!(!is_missing(&FieldValue::List(vec![])));
    }

    #[test]
    fn test_normalize_converts_rich_types() {
        assert_eq!(
            normalize_meta_value(&FieldValue::Path(PathBuf::from("/notes/n1.md"))),
            json!("/notes/n1.md")
        );
        assert_eq!(
            normalize_meta_value(&FieldValue::Vector(vec![0.5, 1.0])),
            json!([0.5, 1.0])
        );

        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(
            normalize_meta_value(&FieldValue::Timestamp(ts)),
            json!("2024-05-01T12:30:00+00:00")
        );
    }

    #[test]
    fn test_normalize_passes_through_and_never_fails() {
        assert_eq!(normalize_meta_value(&FieldValue::Int(7)), json!(7));
        assert_eq!(normalize_meta_value(&FieldValue::Bool(true)), json!(true));
        assert_eq!(normalize_meta_value(&FieldValue::Text("a".into())), json!("a"));
        assert_eq!(normalize_meta_value(&FieldValue::Float(f64::NAN)), Value::Null);
        assert_eq!(
            normalize_meta_value(&FieldValue::Float(f64::INFINITY)),
            Value::Null
        );

        let mut nested = BTreeMap::new();
        nested.insert(
            "tags".to_string(),
            FieldValue::List(vec![FieldValue::Text("x".into()), FieldValue::Null]),
        );
        assert_eq!(
            normalize_meta_value(&FieldValue::Map(nested)),
            json!({"tags": ["x", null]})
        );
    }

    #[test]
    fn test_stringify_scalars_only() {
        assert_eq!(stringify(&FieldValue::Int(42)).as_deref(), Some("42"));
        assert_eq!(stringify(&FieldValue::Float(2.5)).as_deref(), Some("2.5"));
        assert_eq!(stringify(&FieldValue::Float(17.0)).as_deref(), Some("17.0"));
        assert_eq!(stringify(&FieldValue::Float(-0.5)).as_deref(), Some("-0.5"));
        assert_eq!(stringify(&FieldValue::Float(1e16)).as_deref(), Some("1e+16"));
        assert_eq!(stringify(&FieldValue::Float(1.5e-7)).as_deref(), Some("1.5e-07"));
        assert_eq!(stringify(&FieldValue::Float(1e100)).as_deref(), Some("1e+100"));
        assert_eq!(stringify(&FieldValue::Float(f64::NEG_INFINITY)).as_deref(), Some("-inf"));
        assert_eq!(stringify(&FieldValue::Bool(true)).as_deref(), Some("True"));
        assert_eq!(stringify(&FieldValue::Bool(false)).as_deref(), Some("False"));
        assert_eq!(stringify(&FieldValue::Text(" a ".into())).as_deref(), Some(" a "));
        assert_eq!(stringify(&FieldValue::Float(f64::NAN)), None);
        assert_eq!(stringify(&FieldValue::Vector(vec![1.0])), None);
    }
}
