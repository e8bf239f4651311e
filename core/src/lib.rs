//! Client core for the graph HTTP API.
//!
//! # Overview
//! Builds graph API request URLs, attaches the access token, and normalizes
//! the API's heterogeneous response bodies (JSON, flat query strings, bare
//! literals, image redirects) into one `serde_json::Value`.
//!
//! # Design
//! - `GraphClient` holds only a `GraphConfig` and an optional token.
//! - Each verb has a `build_*` half that produces an `HttpRequest` and a
//!   normalizing half; the round-trip itself goes through a `Transport`
//!   chosen by the caller. `UreqTransport` is provided behind the `ureq`
//!   feature.
//! - Errors and data are exclusive: every call returns
//!   `Result<Value, GraphError>`.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod path;
pub mod query;
#[cfg(feature = "ureq")]
pub mod transport;

pub use auth::{authorization_url, authorize, AuthUrlOptions, Authorization};
pub use client::{GraphClient, MultiQuery};
pub use config::GraphConfig;
pub use error::{GraphError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use normalize::normalize;
pub use path::{build_url, GraphPath};
pub use query::Params;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
