//! Synchronous client core for the Twitter REST API.
//!
//! # Overview
//! Turns an endpoint name plus parameters into an `HttpRequest`, runs it
//! through an `HttpTransport`, and decodes the `HttpResponse` into raw text,
//! an ordered mapping, or an object graph. Large integer identifiers never
//! lose precision on the way.
//!
//! # Design
//! - `TwitterClient` holds only immutable configuration and a transport.
//! - `build_query` / `parse_response` keep the I/O boundary explicit; `query`
//!   chains them with the transport in between.
//! - OAuth signing and the HTTP stack sit behind traits (`OAuthSession`,
//!   `HttpTransport`). A ureq transport ships behind the default
//!   `ureq-transport` feature.
//! - Presentation helpers (`text`, `time`, `links`) are independent of the
//!   dispatcher.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod links;
pub mod oauth;
pub mod resources;
pub mod text;
pub mod time;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use client::{build_url, TwitterClient, DEFAULT_EXTENSION};
pub use config::Configuration;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError};
pub use oauth::{OAuthEndpoints, OAuthSession, OAuthToken};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{Decoded, Params, ResponseFormat, Tweet, User};
