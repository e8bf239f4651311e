//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `GraphClient` builds `HttpRequest`
//! values and normalizes `HttpResponse` values; executing the round-trip is
//! the job of a `Transport`, which the caller supplies. Any HTTP stack can be
//! plugged in, and tests can script responses without a network.

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. Graph requests never follow redirects, so an image
/// redirect can be reported instead of downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub follow_redirects: bool,
}

/// An HTTP response described as plain data. `body` is decoded as UTF-8.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes an `HttpRequest` and returns the raw response.
///
/// Non-2xx statuses are responses, not errors: the graph API reports
/// failures in the body. Only failures to obtain a response at all belong
/// in `TransportError`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 302,
            headers: vec![
                ("Content-Type".to_string(), "image/jpeg".to_string()),
                ("location".to_string(), "http://cdn/pic.jpg".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("image/jpeg"));
        assert_eq!(response.header("Location"), Some("http://cdn/pic.jpg"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn closures_are_transports() {
        let transport = |req: &HttpRequest| {
            Ok::<_, TransportError>(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: req.url.clone(),
            })
        };
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/me".to_string(),
            headers: Vec::new(),
            body: None,
            follow_redirects: false,
        };
        assert_eq!(transport.execute(&req).unwrap().body, "http://localhost/me");
        assert_eq!(req.method.as_str(), "GET");
    }
}
