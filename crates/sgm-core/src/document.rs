//! # Document Values
//!
//! A manifest is deserialized into a [`DocumentValue`]: null, boolean,
//! number, string, sequence or mapping. Manifests are written in YAML, but
//! only the JSON-compatible subset is meaningful, so the YAML tree is
//! converted into `serde_json::Value` once at load time and everything
//! downstream works on that single model.

use serde_json::Value;

use crate::error::DocumentError;

/// Untyped document tree. Mapping keys are unique; their order carries no
/// meaning for validation.
pub type DocumentValue = Value;

/// Parse YAML text into a [`DocumentValue`].
///
/// An empty document parses to `Null`.
pub fn from_yaml_str(content: &str) -> Result<DocumentValue, DocumentError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| DocumentError::Yaml(e.to_string()))?;
    yaml_to_json_value(&yaml)
}

/// Parse JSON text into a [`DocumentValue`].
pub fn from_json_str(content: &str) -> Result<DocumentValue, DocumentError> {
    serde_json::from_str(content).map_err(|e| DocumentError::Json(e.to_string()))
}

/// User-facing name of a value's shape, as used in error messages.
pub fn kind_name(value: &DocumentValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Render a value as trimmed YAML for inclusion in an error message.
pub fn to_yaml_snippet(value: &DocumentValue) -> String {
    match serde_yaml::to_string(value) {
        Ok(s) => s.trim().to_string(),
        Err(_) => value.to_string(),
    }
}

/// Convert a `serde_yaml::Value` into a `serde_json::Value`.
///
/// Tags are dropped and the inner value kept. Non-string scalar keys are
/// stringified; sequence or mapping keys are rejected.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, DocumentError> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| DocumentError::Conversion(format!("cannot represent float {f}")))
            } else {
                Err(DocumentError::Conversion(format!(
                    "unsupported YAML number: {n:?}"
                )))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, DocumentError> =
                seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(DocumentError::Conversion(format!(
                            "unsupported YAML map key: {other:?}"
                        )))
                    }
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_manifest_converts_to_json_tree() {
        let yaml = r#"
specVersion: 0.0.1
schema:
  file: ./schema.graphql
dataSources:
  - kind: ethereum/contract
    name: Gravity
    source:
      startBlock: 6175244
enabled: true
"#;
        let value = from_yaml_str(yaml).unwrap();
        assert_eq!(value["specVersion"], "0.0.1");
        assert_eq!(value["schema"]["file"], "./schema.graphql");
        assert_eq!(value["dataSources"][0]["kind"], "ethereum/contract");
        assert_eq!(value["dataSources"][0]["source"]["startBlock"], 6175244);
        assert_eq!(value["enabled"], true);
    }

    #[test]
    fn empty_yaml_is_null() {
        assert_eq!(from_yaml_str("").unwrap(), Value::Null);
    }

    #[test]
    fn numeric_keys_are_stringified() {
        let value = from_yaml_str("1: one\ntrue: yes").unwrap();
        assert_eq!(value["1"], "one");
        assert_eq!(value["true"], "yes");
    }

    #[test]
    fn sequence_keys_are_rejected() {
        let err = from_yaml_str("? [a, b]\n: c").unwrap_err();
        assert!(matches!(err, DocumentError::Conversion(_)));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = from_yaml_str("a: [1, 2").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(true)), "boolean");
        assert_eq!(kind_name(&json!(1)), "number");
        assert_eq!(kind_name(&json!("x")), "string");
        assert_eq!(kind_name(&json!([])), "list");
        assert_eq!(kind_name(&json!({})), "map");
    }

    #[test]
    fn yaml_snippet_is_trimmed() {
        assert_eq!(to_yaml_snippet(&json!("abc")), "abc");
        assert_eq!(to_yaml_snippet(&json!(42)), "42");
        assert_eq!(to_yaml_snippet(&json!(["a", "b"])), "- a\n- b");
    }
}
