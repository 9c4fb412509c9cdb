//! Error types for the Twitter API client.
//!
//! # Design
//! Every failing operation returns an `ApiError` directly; nothing is stashed
//! on the client for later inspection. Non-2xx responses land in `Http` with
//! the raw status code and body untouched, and transport faults keep the
//! transport's own error as their source.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by the dispatcher, the OAuth helpers and the formatters.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// The response body was not valid JSON, or did not fit the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A token endpoint answered without both `oauth_token` and `oauth_token_secret`.
    #[error("token exchange failed (HTTP {status}): {body}")]
    TokenExchange { status: u16, body: String },

    /// `ago` was given something that is neither a unix timestamp nor a known date format.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}
