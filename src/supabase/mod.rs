//! HTTP clients for the hosted backend: a GoTrue-compatible auth API and a
//! PostgREST-compatible data store, both addressed by the service URL and
//! public API key from [`GlobalArgs`](crate::cli::globals::GlobalArgs).
//!
//! Collaborator failures keep the message returned by the backend verbatim so
//! the handlers can surface it inline, unchanged.

pub mod auth;
pub mod store;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Error returned by a hosted collaborator.
///
/// `message` is the backend's own wording, surfaced to the user as-is.
#[derive(Debug, Clone)]
pub struct CollabError {
    pub message: String,
}

impl CollabError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CollabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CollabError {}

impl From<reqwest::Error> for CollabError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub(crate) fn client() -> Result<Client, CollabError> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .build()
        .map_err(CollabError::from)
}

/// Pick the human-readable message out of a collaborator error body.
///
/// GoTrue uses `error_description` or `msg`, PostgREST uses `message`.
pub(crate) fn error_message(json_response: &Value, status: reqwest::StatusCode) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| json_response.get(key).and_then(Value::as_str))
        .map_or_else(|| status.to_string(), ToString::to_string)
}

/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}
