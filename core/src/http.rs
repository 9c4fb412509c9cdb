//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds an
//! `HttpRequest`, hands it to an `HttpTransport`, and parses the returned
//! `HttpResponse`. Parameter placement is decided here, not by the transport:
//! GET parameters live in `query`, POST parameters live in `body`. The only
//! encoding left to the transport is the wire form of `RequestBody`.

use std::error::Error;

use url::form_urlencoded;

/// Error type produced by transports. Propagated to callers unchanged.
pub type TransportError = Box<dyn Error + Send + Sync>;

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

/// Payload of a POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, serialized by the transport.
    Multipart(Vec<(String, String)>),
}

impl RequestBody {
    pub fn fields(&self) -> &[(String, String)] {
        match self {
            RequestBody::Form(fields) | RequestBody::Multipart(fields) => fields,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// The URL with `query` appended as an urlencoded query string.
    pub fn url_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{encoded}", self.url)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request and returns the response, whatever its status.
///
/// Implementations must return 4xx/5xx responses as `Ok`; the dispatcher
/// decides what a failing status means. `Err` is reserved for requests that
/// never got a response.
pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
