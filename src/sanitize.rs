//! Recursive value cleaning for the template/serialization boundary.
//!
//! Front-matter arrives as arbitrary YAML, but everything handed to the
//! page-rendering layer must be a plain JSON shape: arrays where arrays are
//! expected, string keys, no exotic numbers. The conversions in this module
//! are total: they drop or default whatever they cannot represent and never
//! return an error.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

/// The canonical mapping type for front-matter fields and query results.
pub type JsonMap = Map<String, Value>;

/// Cleans a JSON value for the serialization boundary. A top-level `Null`
/// becomes an empty mapping; nested nulls are preserved. Lists and mappings
/// are cleaned recursively, preserving order. Idempotent.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Null => Value::Object(Map::new()),
        other => sanitize_inner(other),
    }
}

fn sanitize_inner(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.iter().map(sanitize_inner).collect())
        }
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), sanitize_inner(value)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Converts a YAML value to JSON. Returns `None` for values with no JSON
/// representation (non-finite floats). Mapping entries whose key or value is
/// unrepresentable are dropped; unrepresentable sequence elements become
/// `null` so element positions are preserved. Keys must be scalars and are
/// stringified. YAML dates arrive as strings and pass through as ISO strings.
pub fn from_yaml(value: &Yaml) -> Option<Value> {
    match value {
        Yaml::Null => Some(Value::Null),
        Yaml::Bool(b) => Some(Value::Bool(*b)),
        Yaml::Number(n) => from_yaml_number(n),
        Yaml::String(s) => Some(Value::String(s.clone())),
        Yaml::Sequence(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| from_yaml(item).unwrap_or(Value::Null))
                .collect(),
        )),
        Yaml::Mapping(mapping) => {
            let mut fields = Map::new();
            for (key, value) in mapping {
                let key = match scalar_key(key) {
                    Some(key) => key,
                    None => continue,
                };
                if let Some(value) = from_yaml(value) {
                    fields.insert(key, value);
                }
            }
            Some(Value::Object(fields))
        }
    }
}

/// Converts a YAML mapping into a [`JsonMap`]. Anything that isn't a mapping
/// (including YAML `null`, i.e. an empty front-matter block) yields an empty
/// map.
pub fn from_yaml_mapping(value: &Yaml) -> JsonMap {
    match from_yaml(value) {
        Some(Value::Object(fields)) => fields,
        _ => JsonMap::new(),
    }
}

fn from_yaml_number(number: &serde_yaml::Number) -> Option<Value> {
    if let Some(i) = number.as_i64() {
        Some(Value::Number(Number::from(i)))
    } else if let Some(u) = number.as_u64() {
        Some(Value::Number(Number::from(u)))
    } else {
        // NaN and the infinities have no JSON representation; `from_f64`
        // rejects them.
        number.as_f64().and_then(Number::from_f64).map(Value::Number)
    }
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns `value` as a list: lists pass through as-is, absent and null
/// values become the empty list, and anything else is wrapped in a
/// single-element list.
pub fn ensure_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_top_level_null() {
        assert_eq!(sanitize(&Value::Null), json!({}));
    }

    #[test]
    fn test_sanitize_preserves_nested_null() {
        let value = json!({"alt": null, "tags": ["paleo", null]});
        assert_eq!(sanitize(&value), value);
    }

    #[test]
    fn test_sanitize_idempotent() {
        let values = vec![
            Value::Null,
            json!("grain-free"),
            json!(3),
            json!([1, "two", null, {"three": 3.5}]),
            json!({"title": "Hello", "tags": [], "nested": {"deep": [null]}}),
        ];
        for value in values {
            let once = sanitize(&value);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_from_yaml_scalars() {
        let yaml: Yaml = serde_yaml::from_str("2021-03-12").unwrap();
        assert_eq!(from_yaml(&yaml), Some(json!("2021-03-12")));

        let yaml: Yaml = serde_yaml::from_str("42").unwrap();
        assert_eq!(from_yaml(&yaml), Some(json!(42)));

        let yaml: Yaml = serde_yaml::from_str("true").unwrap();
        assert_eq!(from_yaml(&yaml), Some(json!(true)));
    }

    #[test]
    fn test_from_yaml_non_finite_float_dropped_from_mapping() {
        let yaml: Yaml = serde_yaml::from_str("rating: .nan\ntitle: Soup").unwrap();
        assert_eq!(from_yaml_mapping(&yaml), json!({"title": "Soup"}).as_object().unwrap().clone());
    }

    #[test]
    fn test_from_yaml_non_finite_float_null_in_sequence() {
        let yaml: Yaml = serde_yaml::from_str("[1, .inf, 2]").unwrap();
        assert_eq!(from_yaml(&yaml), Some(json!([1, null, 2])));
    }

    #[test]
    fn test_from_yaml_stringifies_scalar_keys() {
        let yaml: Yaml = serde_yaml::from_str("1: one\ntrue: flag").unwrap();
        let fields = from_yaml_mapping(&yaml);
        assert_eq!(fields.get("1"), Some(&json!("one")));
        assert_eq!(fields.get("true"), Some(&json!("flag")));
    }

    #[test]
    fn test_from_yaml_mapping_of_non_mapping() {
        let yaml: Yaml = serde_yaml::from_str("[not, a, mapping]").unwrap();
        assert!(from_yaml_mapping(&yaml).is_empty());
        assert!(from_yaml_mapping(&Yaml::Null).is_empty());
    }

    #[test]
    fn test_ensure_list() {
        assert_eq!(ensure_list(None), Vec::<Value>::new());
        assert_eq!(ensure_list(Some(&Value::Null)), Vec::<Value>::new());
        assert_eq!(ensure_list(Some(&json!("paleo"))), vec![json!("paleo")]);
        assert_eq!(
            ensure_list(Some(&json!(["a", "b"]))),
            vec![json!("a"), json!("b")]
        );
        assert_eq!(ensure_list(Some(&json!(7))), vec![json!(7)]);
    }

    #[test]
    fn test_ensure_list_fixpoint() {
        let inputs = vec![
            None,
            Some(json!("paleo")),
            Some(json!(["a", "b"])),
            Some(json!({"k": "v"})),
        ];
        for input in inputs {
            let once = Value::Array(ensure_list(input.as_ref()));
            let twice = Value::Array(ensure_list(Some(&once)));
            assert_eq!(once, twice);
        }
    }
}
