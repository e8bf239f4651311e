//! Request paths and URL construction.

use serde_json::Value;
use url::Url;

/// A value that may name a graph API path.
///
/// Paths from typed callers are always strings. Paths taken from decoded
/// JSON may not be, and are rejected before any request is issued.
pub trait GraphPath {
    fn as_graph_path(&self) -> Option<&str>;
}

impl GraphPath for str {
    fn as_graph_path(&self) -> Option<&str> {
        Some(self)
    }
}

impl GraphPath for String {
    fn as_graph_path(&self) -> Option<&str> {
        Some(self)
    }
}

impl GraphPath for Value {
    fn as_graph_path(&self) -> Option<&str> {
        self.as_str()
    }
}

impl<T: GraphPath + ?Sized> GraphPath for &T {
    fn as_graph_path(&self) -> Option<&str> {
        (**self).as_graph_path()
    }
}

/// Build an absolute request URL from `path` against `graph_url`.
///
/// A missing leading `/` is added. When `token` is present it is appended
/// as `access_token`, joined with `&` if `path` already has a query. An
/// empty token counts as no token.
pub fn build_url(graph_url: &str, path: &str, token: Option<&str>) -> String {
    let mut url = String::with_capacity(graph_url.len() + path.len() + 1);
    url.push_str(graph_url);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        url.push(if path.contains('?') { '&' } else { '?' });
        url.push_str("access_token=");
        url.push_str(token);
    }
    url
}

/// Append `query` to `path`, joining with `&` if `path` already has one.
pub(crate) fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}{query}")
}

/// Mask the value of any `access_token` parameter for logging.
pub fn redact_access_token(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !parsed.query_pairs().any(|(key, _)| key == "access_token") {
        return raw.to_string();
    }
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "access_token" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}
