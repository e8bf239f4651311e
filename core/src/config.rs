//! Endpoint configuration for the graph client.
//!
//! `GraphConfig` is injected into every client rather than kept as process
//! state, so tests can point one client at a mock server without affecting
//! any other.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_OAUTH_DIALOG_URL: &str = "http://www.facebook.com/dialog/oauth";
pub const DEFAULT_OAUTH_DIALOG_URL_MOBILE: &str = "http://m.facebook.com/dialog/oauth";

/// Base host and authorization dialog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    graph_url: String,
    pub oauth_dialog_url: String,
    pub oauth_dialog_url_mobile: String,
}

impl GraphConfig {
    pub fn new(graph_url: &str) -> Self {
        let mut config = Self::default();
        config.set_graph_url(graph_url);
        config
    }

    /// Build a config from `GRAPH_URL`, `GRAPH_OAUTH_DIALOG_URL` and
    /// `GRAPH_OAUTH_DIALOG_URL_MOBILE`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("GRAPH_URL") {
            config.set_graph_url(&url);
        }
        if let Ok(url) = std::env::var("GRAPH_OAUTH_DIALOG_URL") {
            config.oauth_dialog_url = url;
        }
        if let Ok(url) = std::env::var("GRAPH_OAUTH_DIALOG_URL_MOBILE") {
            config.oauth_dialog_url_mobile = url;
        }
        config
    }

    pub fn graph_url(&self) -> &str {
        &self.graph_url
    }

    pub fn set_graph_url(&mut self, url: &str) -> &mut Self {
        self.graph_url = url.trim_end_matches('/').to_string();
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            oauth_dialog_url: DEFAULT_OAUTH_DIALOG_URL.to_string(),
            oauth_dialog_url_mobile: DEFAULT_OAUTH_DIALOG_URL_MOBILE.to_string(),
        }
    }
}
