//! Request dispatch for the graph API.
//!
//! # Design
//! `GraphClient` holds a `GraphConfig` and an optional access token; nothing
//! else survives between calls. Each verb is split into a `build_*` method
//! that produces an `HttpRequest` and `parse_response`, which normalizes the
//! `HttpResponse`. The plain verbs (`get`, `post`, ...) run both halves
//! around a caller-supplied `Transport`.

use log::{debug, warn};
use serde_json::Value;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::normalize::normalize_response;
use crate::path::{build_url, redact_access_token, with_query, GraphPath};
use crate::query::{self, Params};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Argument to `GraphClient::multi_query`: one query, or several named ones
/// answered in a single response.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiQuery {
    Single(String),
    Named(Params),
}

impl MultiQuery {
    fn to_query_string(&self) -> String {
        match self {
            MultiQuery::Single(q) => {
                let mut params = Params::new();
                params.insert("q".to_string(), Value::String(q.clone()));
                query::stringify(&params)
            }
            MultiQuery::Named(queries) => query::stringify(queries),
        }
    }
}

impl From<&str> for MultiQuery {
    fn from(q: &str) -> Self {
        MultiQuery::Single(q.to_string())
    }
}

impl From<String> for MultiQuery {
    fn from(q: String) -> Self {
        MultiQuery::Single(q)
    }
}

impl From<Params> for MultiQuery {
    fn from(queries: Params) -> Self {
        MultiQuery::Named(queries)
    }
}

/// Client for the graph API.
#[derive(Debug, Clone, Default)]
pub struct GraphClient {
    config: GraphConfig,
    token: Option<String>,
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Self {
        Self { config, token: None }
    }

    pub fn with_token(config: GraphConfig, token: impl Into<String>) -> Self {
        let mut client = Self::new(config);
        client.set_token(Some(token.into()));
        client
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the access token. An empty token clears it.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GraphConfig {
        &mut self.config
    }

    /// Absolute URL for `path` with this client's token attached.
    pub fn url(&self, path: &str) -> String {
        build_url(self.config.graph_url(), path, self.token())
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
            follow_redirects: false,
        }
    }

    /// Build a GET for `path`, with `params` appended to its query string.
    pub fn build_get<P: GraphPath + ?Sized>(&self, path: &P, params: Option<&Params>) -> Result<HttpRequest, GraphError> {
        let path = path.as_graph_path().ok_or(GraphError::InvalidPath)?;
        let path = match params {
            Some(params) => with_query(path, &query::stringify(params)),
            None => path.to_string(),
        };
        Ok(self.request(HttpMethod::Get, &path, None))
    }

    /// Build a POST for `path` carrying `body` as a form.
    pub fn build_post<P: GraphPath + ?Sized>(&self, path: &P, body: Option<&Params>) -> Result<HttpRequest, GraphError> {
        let path = path.as_graph_path().ok_or(GraphError::InvalidPath)?;
        Ok(self.request(HttpMethod::Post, path, body.map(query::stringify)))
    }

    /// Build the request that deletes the object at `path`.
    ///
    /// The graph API takes deletions as a bodiless POST to the object.
    pub fn build_del(&self, path: &str) -> HttpRequest {
        self.request(HttpMethod::Post, path, None)
    }

    pub fn build_search(&self, query: &Params) -> HttpRequest {
        let path = with_query("/search", &query::stringify(query));
        self.request(HttpMethod::Get, &path, None)
    }

    pub fn build_multi_query(&self, query: &MultiQuery) -> HttpRequest {
        let path = with_query("/search", &query.to_query_string());
        self.request(HttpMethod::Get, &path, None)
    }

    /// Normalize a response produced for one of this client's requests.
    pub fn parse_response(&self, response: &HttpResponse) -> Result<Value, GraphError> {
        normalize_response(response)
    }

    /// Execute `request` over `transport` and normalize the outcome.
    pub fn dispatch<T: Transport + ?Sized>(&self, transport: &T, request: &HttpRequest) -> Result<Value, GraphError> {
        debug!("{} {}", request.method.as_str(), redact_access_token(&request.url));
        let response = transport.execute(request).map_err(|e| {
            warn!("{} {} failed: {e}", request.method.as_str(), redact_access_token(&request.url));
            GraphError::Transport(e)
        })?;
        debug!("status {} ({} bytes)", response.status, response.body.len());
        self.parse_response(&response)
    }

    pub fn get<T, P>(&self, transport: &T, path: &P, params: Option<&Params>) -> Result<Value, GraphError>
    where
        T: Transport + ?Sized,
        P: GraphPath + ?Sized,
    {
        let request = self.build_get(path, params)?;
        self.dispatch(transport, &request)
    }

    pub fn post<T, P>(&self, transport: &T, path: &P, body: Option<&Params>) -> Result<Value, GraphError>
    where
        T: Transport + ?Sized,
        P: GraphPath + ?Sized,
    {
        let request = self.build_post(path, body)?;
        self.dispatch(transport, &request)
    }

    pub fn del<T: Transport + ?Sized>(&self, transport: &T, path: &str) -> Result<Value, GraphError> {
        self.dispatch(transport, &self.build_del(path))
    }

    pub fn search<T: Transport + ?Sized>(&self, transport: &T, query: &Params) -> Result<Value, GraphError> {
        self.dispatch(transport, &self.build_search(query))
    }

    pub fn multi_query<T, Q>(&self, transport: &T, query: Q) -> Result<Value, GraphError>
    where
        T: Transport + ?Sized,
        Q: Into<MultiQuery>,
    {
        self.dispatch(transport, &self.build_multi_query(&query.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use serde_json::json;
    use std::cell::Cell;

    fn client() -> GraphClient {
        GraphClient::new(GraphConfig::new("http://localhost:3000"))
    }

    fn params(value: Value) -> Params {
        value.as_object().unwrap().clone()
    }

    fn json_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_produces_correct_request() {
        let req = client().build_get("zuck", None).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/zuck");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
        assert!(!req.follow_redirects);
    }

    #[test]
    fn build_get_appends_params_then_token() {
        let client = GraphClient::with_token(GraphConfig::new("http://localhost:3000"), "tok");
        let req = client.build_get("/zuck", Some(&params(json!({ "fields": "picture" })))).unwrap();
        assert_eq!(req.url, "http://localhost:3000/zuck?fields=picture&access_token=tok");
    }

    #[test]
    fn build_get_rejects_non_string_path() {
        let err = client().build_get(&json!(12), None).unwrap_err();
        assert!(matches!(err, GraphError::InvalidPath));
    }

    #[test]
    fn build_post_produces_form_request() {
        let req = client()
            .build_post("me/feed", Some(&params(json!({ "message": "heyooo budday" }))))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/me/feed");
        assert_eq!(req.body.as_deref(), Some("message=heyooo+budday"));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())]
        );
        assert!(!req.follow_redirects);
    }

    #[test]
    fn build_post_without_body() {
        let req = client().build_post("me/likes", None).unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_del_posts_to_single_host() {
        let client = GraphClient::with_token(GraphConfig::new("http://localhost:3000"), "tok");
        let req = client.build_del("/1_2");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/1_2?access_token=tok");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_search_uses_search_endpoint() {
        let client = GraphClient::with_token(GraphConfig::new("http://localhost:3000"), "tok");
        let req = client.build_search(&params(json!({ "q": "watermelon", "type": "post" })));
        assert_eq!(
            req.url,
            "http://localhost:3000/search?q=watermelon&type=post&access_token=tok"
        );
    }

    #[test]
    fn build_multi_query_single_and_named() {
        let req = client().build_multi_query(&"SELECT name FROM user WHERE uid = me()".into());
        assert_eq!(
            req.url,
            "http://localhost:3000/search?q=SELECT+name+FROM+user+WHERE+uid+%3D+me%28%29"
        );

        let named = MultiQuery::from(params(json!({ "name": "SELECT name FROM user", "friends": "SELECT uid2 FROM friend" })));
        let req = client().build_multi_query(&named);
        assert_eq!(
            req.url,
            "http://localhost:3000/search?name=SELECT+name+FROM+user&friends=SELECT+uid2+FROM+friend"
        );
    }

    #[test]
    fn config_change_applies_to_next_request() {
        let mut client = client();
        client.config_mut().set_graph_url("http://127.0.0.1:9999");
        assert_eq!(client.build_get("me", None).unwrap().url, "http://127.0.0.1:9999/me");
        client.config_mut().set_graph_url("http://localhost:3000");
        assert_eq!(client.build_get("me", None).unwrap().url, "http://localhost:3000/me");
    }

    #[test]
    fn token_can_be_set_later() {
        let mut client = client();
        assert!(client.token().is_none());
        client.set_token(Some("late".to_string()));
        assert_eq!(client.url("me"), "http://localhost:3000/me?access_token=late");
    }

    #[test]
    fn empty_token_is_no_token() {
        let client = GraphClient::with_token(GraphConfig::new("http://h"), "");
        assert!(client.token().is_none());
        assert_eq!(client.url("me"), "http://h/me");

        let mut client = client;
        client.set_token(Some("tok".to_string()));
        client.set_token(Some(String::new()));
        assert_eq!(client.build_get("me", None).unwrap().url, "http://h/me");
    }

    #[test]
    fn get_with_invalid_path_never_calls_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| {
            calls.set(calls.get() + 1);
            Ok::<_, TransportError>(json_response("{}"))
        };
        let err = client().get(&transport, &json!(null), None).unwrap_err();
        assert_eq!(err.message(), "Graph api url must be a string");
        let err = client().post(&transport, &json!(["me"]), None).unwrap_err();
        assert!(matches!(err, GraphError::InvalidPath));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn transport_failure_short_circuits() {
        let transport = |_: &HttpRequest| Err::<HttpResponse, _>(TransportError::new("connection refused"));
        let err = client().get(&transport, "me", None).unwrap_err();
        assert!(matches!(err, GraphError::Transport(_)));
        assert_eq!(err.message(), "Error processing request");
    }

    #[test]
    fn get_returns_normalized_json() {
        let transport = |req: &HttpRequest| {
            assert_eq!(req.url, "http://localhost:3000/zuck");
            Ok::<_, TransportError>(json_response(r#"{"id":"4","name":"Mark"}"#))
        };
        let value = client().get(&transport, "zuck", None).unwrap();
        assert_eq!(value, json!({ "id": "4", "name": "Mark" }));
    }

    #[test]
    fn get_surfaces_domain_error() {
        let transport = |_: &HttpRequest| {
            Ok::<_, TransportError>(json_response(r#"{"error":{"message":"bad token","code":190}}"#))
        };
        let err = client().get(&transport, "me", None).unwrap_err();
        assert_eq!(err.api_error().unwrap()["code"], 190);
    }

    #[test]
    fn del_returns_literal_as_data() {
        let transport = |req: &HttpRequest| {
            assert_eq!(req.method, HttpMethod::Post);
            Ok::<_, TransportError>(HttpResponse {
                status: 200,
                headers: vec![("content-type".to_string(), "text/javascript".to_string())],
                body: "true".to_string(),
            })
        };
        let value = client().del(&transport, "1_2").unwrap();
        assert_eq!(value, json!({ "data": "true" }));
    }
}
