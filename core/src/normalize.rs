//! Turns a raw graph API response into a single JSON value.
//!
//! # Design
//! The graph API answers in several shapes: JSON documents, flat
//! `key=value&...` strings (the access-token exchange), bare literals such
//! as `true`, and redirects to a binary image. All of them are mapped to a
//! `serde_json::Value`, and an `error` field embedded in an otherwise
//! successful body is lifted into `GraphError::Api`. Returning a `Result`
//! makes error and data mutually exclusive.

use log::debug;
use serde_json::{json, Value};

use crate::error::GraphError;
use crate::http::HttpResponse;
use crate::query;

/// Normalize a full response, reading the content type and redirect target
/// from its headers.
pub fn normalize_response(response: &HttpResponse) -> Result<Value, GraphError> {
    normalize(
        &response.body,
        response.header("content-type"),
        response.header("location"),
    )
}

/// Normalize a response body.
///
/// A content type containing `image` short-circuits to an image descriptor
/// whatever the body holds; `location` is the redirect target, or `null`
/// when the response carried none.
pub fn normalize(body: &str, content_type: Option<&str>, location: Option<&str>) -> Result<Value, GraphError> {
    if content_type.is_some_and(|ct| ct.contains("image")) {
        debug!("image response, location {location:?}");
        return Ok(json!({ "image": true, "location": location }));
    }

    let value = if body.contains('{') && body.contains('}') {
        serde_json::from_str(body).map_err(GraphError::Parse)?
    } else {
        Value::Object(query::parse(&flat_body(body)))
    };

    if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
        debug!("response carries an error field");
        return Err(GraphError::Api(error.clone()));
    }
    Ok(value)
}

// Bare literals such as `true` become `data=true`.
fn flat_body(body: &str) -> String {
    let body = if body.contains('=') {
        body.to_string()
    } else {
        format!("data={body}")
    };
    if body.starts_with('?') {
        body
    } else {
        format!("?{body}")
    }
}

/// Truthiness as the graph API's clients have always judged an `error` field.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
