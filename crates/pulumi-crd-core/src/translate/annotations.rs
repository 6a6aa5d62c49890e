//! Annotations copied from a source node onto its translated schema
//!
//! `description`, `default` and `enum` are applied after the node's shape has
//! been translated, so a ref site's annotations override the referent's.

use serde_json::{Map, Value};

use super::Rejection;

/// Copy `description`, `default` and `enum` from `source` onto `out`
pub(super) fn apply(out: &mut Map<String, Value>, source: &Map<String, Value>) -> Result<(), Rejection> {
    if let Some(description) = source.get("description") {
        if !description.is_string() {
            return Err(Rejection::skip("description must be a string"));
        }
        out.insert("description".into(), description.clone());
    }

    if let Some(default) = source.get("default") {
        out.insert("default".into(), default.clone());
    }

    if let Some(raw) = source.get("enum") {
        let values = enum_values(raw)?;
        if let Some(type_name) = out.get("type").and_then(Value::as_str) {
            if let Some(bad) = values.iter().find(|v| !is_compatible(type_name, v)) {
                return Err(Rejection::hard(format!(
                    "enum value {bad} is not compatible with type \"{type_name}\""
                )));
            }
        }
        out.insert("enum".into(), Value::Array(values));
    }

    Ok(())
}

/// Flatten Pulumi enum entries into plain values
///
/// Pulumi writes enums either as bare scalars or as `{ "name": ..., "value": ... }`
/// objects; only the `value` is kept.
fn enum_values(raw: &Value) -> Result<Vec<Value>, Rejection> {
    let Some(entries) = raw.as_array() else {
        return Err(Rejection::skip("enum must be a list"));
    };

    entries
        .iter()
        .map(|entry| match entry {
            Value::Object(obj) => obj
                .get("value")
                .cloned()
                .ok_or_else(|| Rejection::skip("enum object entries must have a value field")),
            Value::Array(_) => Err(Rejection::skip(
                "enum entries must be scalars or objects with a value field",
            )),
            scalar => Ok(scalar.clone()),
        })
        .collect()
}

fn is_compatible(type_name: &str, value: &Value) -> bool {
    match (type_name, value) {
        (_, Value::Null) => true,
        ("integer", Value::Number(n)) => n.as_f64().is_some_and(|f| f.trunc() == f),
        ("number", Value::Number(_)) => true,
        ("string", Value::String(_)) => true,
        ("boolean", Value::Bool(_)) => true,
        ("array", Value::Array(_)) => true,
        ("object", Value::Object(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_copies_description_and_default() {
        let mut out = object(json!({ "type": "integer" }));
        let source = object(json!({ "description": "Replica count", "default": 3 }));
        apply(&mut out, &source).unwrap();
        assert_eq!(out["description"], json!("Replica count"));
        assert_eq!(out["default"], json!(3));
    }

    #[test]
    fn test_default_copied_verbatim() {
        let mut out = object(json!({ "type": "object" }));
        let default = json!({ "nested": [1, "two", null, { "deep": true }] });
        apply(&mut out, &object(json!({ "default": default.clone() }))).unwrap();
        assert_eq!(out["default"], default);
    }

    #[test]
    fn test_non_string_description_skipped() {
        let mut out = object(json!({ "type": "string" }));
        let err = apply(&mut out, &object(json!({ "description": 42 }))).unwrap_err();
        assert_eq!(err.severity, Severity::Skippable);
        assert_eq!(err.summary, "description must be a string");
    }

    #[test]
    fn test_enum_object_entries_flattened() {
        let mut out = object(json!({ "type": "string" }));
        let source = object(json!({
            "enum": [{ "name": "Small", "value": "small" }, { "value": "large" }]
        }));
        apply(&mut out, &source).unwrap();
        assert_eq!(out["enum"], json!(["small", "large"]));
    }

    #[test]
    fn test_enum_entry_without_value_skipped() {
        let mut out = object(json!({ "type": "string" }));
        let err = apply(&mut out, &object(json!({ "enum": [{ "name": "x" }] }))).unwrap_err();
        assert_eq!(err.severity, Severity::Skippable);
    }

    #[test]
    fn test_enum_must_be_list() {
        let mut out = object(json!({ "type": "string" }));
        let err = apply(&mut out, &object(json!({ "enum": "small" }))).unwrap_err();
        assert_eq!(err.summary, "enum must be a list");
        assert_eq!(err.severity, Severity::Skippable);
    }

    #[test]
    fn test_enum_type_mismatch_is_hard() {
        let mut out = object(json!({ "type": "string" }));
        let err = apply(&mut out, &object(json!({ "enum": ["a", 1] }))).unwrap_err();
        assert_eq!(err.severity, Severity::Hard);
        assert_eq!(err.summary, "enum value 1 is not compatible with type \"string\"");
    }

    #[test]
    fn test_integer_enum_compatibility() {
        assert!(is_compatible("integer", &json!(3)));
        assert!(is_compatible("integer", &json!(3.0)));
        assert!(!is_compatible("integer", &json!(3.5)));
        assert!(is_compatible("number", &json!(3.5)));
        assert!(!is_compatible("boolean", &json!("true")));
        assert!(is_compatible("string", &Value::Null));
        assert!(is_compatible("object", &json!({})));
        assert!(!is_compatible("array", &json!({})));
    }
}
