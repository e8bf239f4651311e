//! Query-string codec for request parameters and flat response bodies.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Request parameters, keyed by name.
pub type Params = Map<String, Value>;

/// Serialize `params` as an `application/x-www-form-urlencoded` string.
///
/// Strings are sent verbatim, numbers and booleans as their JSON text, and
/// arrays as one pair per element. `null` and nested objects have no flat
/// representation and are sent as empty values.
pub fn stringify(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, &scalar(item));
                }
            }
            other => {
                serializer.append_pair(key, &scalar(other));
            }
        }
    }
    serializer.finish()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Decode a query string into an object of string values.
///
/// A leading `?` is ignored. Keys that repeat collect into an array in the
/// order they appear.
pub fn parse(input: &str) -> Map<String, Value> {
    let input = input.strip_prefix('?').unwrap_or(input);
    let mut out = Map::new();
    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        let value = Value::String(value.into_owned());
        match out.get_mut(key.as_ref()) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                out.insert(key.into_owned(), value);
            }
        }
    }
    out
}
