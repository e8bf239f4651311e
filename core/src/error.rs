//! Error types for the graph API client.
//!
//! # Design
//! Four failure kinds share one channel: a bad path argument, a transport
//! failure, a body that looked like JSON but did not parse, and a domain
//! error the remote API embedded under an `error` key. The first three carry
//! the fixed messages callers match on; the domain variant keeps the remote
//! error value untouched.

use serde_json::{json, Value};
use thiserror::Error;

/// Errors returned by `GraphClient` operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The path argument was not a string. No request was issued.
    #[error("Graph api url must be a string")]
    InvalidPath,

    /// The transport failed before a response was received.
    #[error("Error processing request")]
    Transport(#[source] TransportError),

    /// The body contained `{` and `}` but was not valid JSON.
    #[error("Error parsing json")]
    Parse(#[source] serde_json::Error),

    /// The remote API answered with a truthy `error` field.
    #[error("{}", api_message(.0))]
    Api(Value),
}

impl GraphError {
    /// Human-readable message for this error.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The domain error object, if the remote API reported one.
    pub fn api_error(&self) -> Option<&Value> {
        match self {
            GraphError::Api(value) => Some(value),
            _ => None,
        }
    }

    /// Render as the `{message, exception}` mapping callers log or forward.
    ///
    /// Domain errors are returned as-is since they already are the remote
    /// API's own error object.
    pub fn to_value(&self) -> Value {
        match self {
            GraphError::InvalidPath => json!({ "message": self.message() }),
            GraphError::Transport(e) => json!({ "message": self.message(), "exception": e.to_string() }),
            GraphError::Parse(e) => json!({ "message": self.message(), "exception": e.to_string() }),
            GraphError::Api(value) => value.clone(),
        }
    }
}

fn api_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// A failure reported by a `Transport` implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<TransportError> for GraphError {
    fn from(e: TransportError) -> Self {
        GraphError::Transport(e)
    }
}
