//! OAuth dialog URLs and the code-for-token exchange.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GraphClient;
use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::http::Transport;
use crate::query::{self, Params};

pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Options for `authorization_url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthUrlOptions {
    /// Use the mobile dialog instead of the desktop one.
    pub mobile: bool,
}

/// The dialog URL a user is sent to, with `params` (usually `client_id` and
/// `redirect_uri`) as its query.
pub fn authorization_url(config: &GraphConfig, params: &Params, options: AuthUrlOptions) -> String {
    let base = if options.mobile {
        &config.oauth_dialog_url_mobile
    } else {
        &config.oauth_dialog_url
    };
    format!("{base}?{}", query::stringify(params))
}

/// Outcome of a successful `authorize`.
#[derive(Debug, Clone)]
pub struct Authorization {
    /// A client carrying the issued access token.
    pub client: GraphClient,
    /// The normalized token response, e.g. `{access_token, expires}`.
    pub response: Value,
}

/// Exchange an authorization code for an access token.
///
/// `params` usually holds `client_id`, `redirect_uri`, `client_secret` and
/// `code`. The request is made by a fresh client with no token.
pub fn authorize<T: Transport + ?Sized>(
    config: &GraphConfig,
    transport: &T,
    params: &Params,
) -> Result<Authorization, GraphError> {
    let mut client = GraphClient::new(config.clone());
    let response = client.get(transport, ACCESS_TOKEN_PATH, Some(params))?;

    let token = response.get("access_token").and_then(|t| match t {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    if token.as_deref().map_or(true, str::is_empty) {
        debug!("token response has no usable access_token field");
    }
    client.set_token(token);

    Ok(Authorization { client, response })
}
