//! Request dispatcher for the Twitter REST API.
//!
//! # Design
//! `TwitterClient` holds an immutable `Configuration` and a transport, and
//! carries no mutable state between calls. Every call is split the same way
//! the I/O boundary is: `build_query` produces an `HttpRequest` and the
//! response format, the transport executes it, and `parse_response` turns the
//! `HttpResponse` into a `Decoded` value. Both halves are usable on their own
//! when the caller wants to run the HTTP round-trip itself.

use serde::de::DeserializeOwned;
use tracing::Level;

use crate::config::Configuration;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::json;
use crate::types::{Decoded, Params, ResponseFormat, FORMAT_KEY};

/// Default payload extension appended to endpoint names.
pub const DEFAULT_EXTENSION: &str = "json";

/// `https://{host}/{version}/{name}.{extension}`. `name` is not validated.
pub fn build_url(host: &str, version: &str, name: &str, extension: &str) -> String {
    compose_url("https", host, version, name, extension)
}

fn compose_url(scheme: &str, host: &str, version: &str, name: &str, extension: &str) -> String {
    format!("{scheme}://{host}/{version}/{name}.{extension}")
}

/// Synchronous, stateless client for the Twitter REST API.
#[derive(Debug, Clone)]
pub struct TwitterClient<T> {
    config: Configuration,
    transport: T,
}

impl<T> TwitterClient<T> {
    pub fn new(config: Configuration, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for `name`. Media uploads (multipart) go to the upload
    /// host, everything else to the API host.
    pub fn endpoint_url(&self, name: &str, multipart: bool, extension: &str) -> String {
        let host = if multipart {
            &self.config.upload_url
        } else {
            &self.config.api_url
        };
        compose_url(&self.config.scheme, host, &self.config.api_version, name, extension)
    }

    /// Build the outgoing request for `name` and pick the response format.
    ///
    /// The reserved `format` parameter is consumed here and never sent.
    pub fn build_query(
        &self,
        name: &str,
        method: HttpMethod,
        mut params: Params,
        multipart: bool,
        extension: &str,
    ) -> (HttpRequest, ResponseFormat) {
        let url = self.endpoint_url(name, multipart, extension);
        let format = params
            .remove(FORMAT_KEY)
            .map(|f| ResponseFormat::from_param(&f))
            .unwrap_or_default();

        if self.log_enabled(Level::DEBUG) {
            tracing::debug!(
                method = method.as_str(),
                query = name,
                url = %url,
                params = %params.to_query_string(),
                multipart,
                format = format.as_str(),
                "Making Request"
            );
        }

        let pairs = params.into_pairs();
        let request = match method {
            HttpMethod::Get => HttpRequest {
                method,
                url,
                query: pairs,
                body: None,
            },
            HttpMethod::Post => HttpRequest {
                method,
                url,
                query: Vec::new(),
                body: Some(if multipart {
                    RequestBody::Multipart(pairs)
                } else {
                    RequestBody::Form(pairs)
                }),
            },
        };
        (request, format)
    }

    /// Decode `response` as `format`. Non-2xx responses become
    /// `ApiError::Http` with the status and body untouched.
    pub fn parse_response(
        &self,
        response: HttpResponse,
        format: ResponseFormat,
    ) -> Result<Decoded, ApiError> {
        check_status(&response)?;
        match format {
            ResponseFormat::Json => Ok(Decoded::Raw(response.body)),
            ResponseFormat::Object => Ok(Decoded::Object(json::decode(&response.body)?)),
            ResponseFormat::Mapping => Ok(Decoded::Mapping(json::decode(&response.body)?)),
        }
    }

    /// Emit a log event with `context` as a list of key/value pairs. DEBUG
    /// and TRACE are dropped unless `debug_mode` is set; without a `tracing`
    /// subscriber every event is a no-op.
    pub fn log(&self, level: Level, message: &str, context: &[(&str, String)]) {
        if !self.log_enabled(level) {
            return;
        }
        match level {
            Level::ERROR => tracing::error!(context = ?context, "{message}"),
            Level::WARN => tracing::warn!(context = ?context, "{message}"),
            Level::INFO => tracing::info!(context = ?context, "{message}"),
            Level::DEBUG => tracing::debug!(context = ?context, "{message}"),
            _ => tracing::trace!(context = ?context, "{message}"),
        }
    }

    pub fn log_enabled(&self, level: Level) -> bool {
        self.config.debug_mode || !matches!(level, Level::DEBUG | Level::TRACE)
    }
}

impl<T: HttpTransport> TwitterClient<T> {
    /// Build, dispatch and decode one call. Failures are returned as-is:
    /// no retry, no fallback to the raw body.
    pub fn query(
        &self,
        name: &str,
        method: HttpMethod,
        params: Params,
        multipart: bool,
        extension: &str,
    ) -> Result<Decoded, ApiError> {
        let (request, format) = self.build_query(name, method, params, multipart, extension);
        let response = self.transport.send(&request).map_err(ApiError::Transport)?;
        self.parse_response(response, format)
    }

    pub fn get(
        &self,
        name: &str,
        params: Params,
        multipart: bool,
        extension: &str,
    ) -> Result<Decoded, ApiError> {
        self.query(name, HttpMethod::Get, params, multipart, extension)
    }

    pub fn post(&self, name: &str, params: Params, multipart: bool) -> Result<Decoded, ApiError> {
        self.query(name, HttpMethod::Post, params, multipart, DEFAULT_EXTENSION)
    }

    /// GET `name` and deserialize the object graph into `D`.
    pub fn get_as<D: DeserializeOwned>(&self, name: &str, params: Params) -> Result<D, ApiError> {
        self.get(name, params.with(FORMAT_KEY, "object"), false, DEFAULT_EXTENSION)?
            .into_typed()
    }

    /// POST `name` and deserialize the object graph into `D`.
    pub fn post_as<D: DeserializeOwned>(&self, name: &str, params: Params) -> Result<D, ApiError> {
        self.post(name, params.with(FORMAT_KEY, "object"), false)?
            .into_typed()
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::http::TransportError;
    use crate::types::Tweet;

    /// Records every request and answers with a canned response.
    struct FakeTransport {
        response: Result<HttpResponse, String>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.sent.borrow().last().cloned().unwrap()
        }
    }

    impl HttpTransport for FakeTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            match &self.response {
                Ok(resp) => Ok(resp.clone()),
                Err(msg) => Err(msg.clone().into()),
            }
        }
    }

    fn client(transport: FakeTransport) -> TwitterClient<FakeTransport> {
        TwitterClient::new(Configuration::default(), transport)
    }

    #[test]
    fn build_url_composes_https_url() {
        assert_eq!(
            build_url("api.example.com", "1.1", "statuses/show", "json"),
            "https://api.example.com/1.1/statuses/show.json"
        );
    }

    #[test]
    fn multipart_uses_upload_host() {
        let c = client(FakeTransport::replying(200, "{}"));
        assert_eq!(
            c.endpoint_url("media/upload", true, "json"),
            "https://upload.twitter.com/1.1/media/upload.json"
        );
        assert_eq!(
            c.endpoint_url("statuses/update", false, "json"),
            "https://api.twitter.com/1.1/statuses/update.json"
        );
    }

    #[test]
    fn get_places_params_in_query_only() {
        let c = client(FakeTransport::replying(200, "{}"));
        let params = Params::new().with("id", 20).with("trim_user", true);
        let (req, format) = c.build_query("statuses/show", HttpMethod::Get, params, false, "json");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.query,
            vec![
                ("id".to_string(), "20".to_string()),
                ("trim_user".to_string(), "true".to_string())
            ]
        );
        assert!(req.body.is_none());
        assert_eq!(format, ResponseFormat::Mapping);
    }

    #[test]
    fn post_places_params_in_form_body_only() {
        let c = client(FakeTransport::replying(200, "{}"));
        let params = Params::new().with("status", "hello");
        let (req, _) = c.build_query("statuses/update", HttpMethod::Post, params, false, "json");
        assert!(req.query.is_empty());
        assert_eq!(
            req.body,
            Some(RequestBody::Form(vec![("status".to_string(), "hello".to_string())]))
        );
    }

    #[test]
    fn multipart_post_uses_multipart_body() {
        let c = client(FakeTransport::replying(200, "{}"));
        let params = Params::new().with("media_data", "aGVsbG8=");
        let (req, _) = c.build_query("media/upload", HttpMethod::Post, params, true, "json");
        assert!(matches!(req.body, Some(RequestBody::Multipart(_))));
        assert!(req.url.starts_with("https://upload.twitter.com/"));
    }

    #[test]
    fn format_key_is_consumed_for_every_method() {
        let c = client(FakeTransport::replying(200, "{}"));
        for (method, multipart) in [
            (HttpMethod::Get, false),
            (HttpMethod::Post, false),
            (HttpMethod::Post, true),
        ] {
            let params = Params::new().with("format", "object").with("id", 1);
            let (req, format) = c.build_query("statuses/show", method, params, multipart, "json");
            assert_eq!(format, ResponseFormat::Object);
            assert!(req.query.iter().all(|(k, _)| k != "format"));
            if let Some(body) = &req.body {
                assert!(body.fields().iter().all(|(k, _)| k != "format"));
            }
        }
    }

    #[test]
    fn raw_format_returns_body_byte_for_byte() {
        let body = "{\"id\": 9223372036854775807,  \"text\":\"caf\u{e9}\"}";
        let c = client(FakeTransport::replying(200, body));
        let decoded = c
            .get("statuses/show", Params::new().with("format", "json"), false, "json")
            .unwrap();
        assert_eq!(decoded, Decoded::Raw(body.to_string()));
    }

    #[test]
    fn absent_format_defaults_to_mapping() {
        let c = client(FakeTransport::replying(200, r#"{"id":9223372036854775807}"#));
        let decoded = c.get("statuses/show", Params::new(), false, "json").unwrap();
        let Decoded::Mapping(value) = decoded else {
            panic!("expected mapping, got {decoded:?}");
        };
        assert_eq!(value["id"].as_i64(), Some(9223372036854775807));
    }

    #[test]
    fn object_format_keeps_large_ids_exact() {
        let c = client(FakeTransport::replying(
            200,
            r#"{"id":9223372036854775807,"quoted_id":123456789012345678901234}"#,
        ));
        let decoded = c
            .get("statuses/show", Params::new().with("format", "object"), false, "json")
            .unwrap();
        let Decoded::Object(value) = decoded else {
            panic!("expected object, got {decoded:?}");
        };
        assert_eq!(value["id"].to_string(), "9223372036854775807");
        assert_eq!(value["quoted_id"], "123456789012345678901234");
    }

    #[test]
    fn http_failure_propagates() {
        let c = client(FakeTransport::replying(503, "Over capacity"));
        let err = c.get("statuses/show", Params::new(), false, "json").unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Over capacity");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn transport_failure_propagates() {
        let c = client(FakeTransport::failing("connection reset"));
        let err = c.post("statuses/update", Params::new(), false).unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref e) if e.to_string() == "connection reset"));
    }

    #[test]
    fn bad_json_is_decode_error_not_raw_fallback() {
        let c = client(FakeTransport::replying(200, "<html>oops</html>"));
        let err = c.get("statuses/show", Params::new(), false, "json").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn post_always_uses_json_extension() {
        let transport = FakeTransport::replying(200, "{}");
        let c = client(transport);
        c.post("statuses/update", Params::new().with("status", "hi"), false)
            .unwrap();
        assert!(c.transport().last().url.ends_with("statuses/update.json"));
    }

    #[test]
    fn get_as_decodes_typed_graph_and_strips_format() {
        let c = client(FakeTransport::replying(
            200,
            r#"{"id_str":"20","text":"just setting up my twttr","user":{"screen_name":"jack"}}"#,
        ));
        let tweet: Tweet = c.get_as("statuses/show", Params::new().with("id", 20)).unwrap();
        assert_eq!(tweet.user.screen_name, "jack");
        assert!(c.transport().last().query.iter().all(|(k, _)| k != "format"));
    }

    #[derive(Debug)]
    struct Captured {
        level: Level,
        fields: BTreeMap<String, String>,
    }

    /// Collects every event with its fields rendered as strings.
    struct Capture(Arc<Mutex<Vec<Captured>>>);

    struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

    impl Visit for FieldVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = BTreeMap::new();
            event.record(&mut FieldVisitor(&mut fields));
            self.0.lock().unwrap().push(Captured {
                level: *event.metadata().level(),
                fields,
            });
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Capture(Arc::clone(&events)));
        tracing::subscriber::with_default(subscriber, f);
        let captured = std::mem::take(&mut *events.lock().unwrap());
        captured
    }

    fn field<'a>(event: &'a Captured, name: &str) -> Option<&'a str> {
        event.fields.get(name).map(String::as_str)
    }

    fn build_update(debug_mode: bool) -> Vec<Captured> {
        let c = TwitterClient::new(Configuration::default().with_debug(debug_mode), ());
        capture(|| {
            c.build_query(
                "statuses/update",
                HttpMethod::Post,
                Params::new()
                    .with("status", "a b=c")
                    .with("format", "object"),
                false,
                "json",
            );
        })
    }

    #[test]
    fn request_event_carries_structured_fields() {
        let events = build_update(true);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.level, Level::DEBUG);

        assert_eq!(field(event, "message"), Some("Making Request"));
        assert_eq!(field(event, "method"), Some("POST"));
        assert_eq!(field(event, "query"), Some("statuses/update"));
        assert_eq!(
            field(event, "url"),
            Some("https://api.twitter.com/1.1/statuses/update.json")
        );
        assert_eq!(field(event, "params"), Some("status=a+b%3Dc"));
        assert_eq!(field(event, "multipart"), Some("false"));
        assert_eq!(field(event, "format"), Some("object"));
    }

    #[test]
    fn request_event_is_silent_without_debug_mode() {
        assert!(build_update(false).is_empty());
    }

    #[test]
    fn log_keeps_context_pairs_apart() {
        let c = TwitterClient::new(Configuration::default(), ());
        let events = capture(|| {
            c.log(
                Level::WARN,
                "rate limited",
                &[("reset", "in 15 min".to_string()), ("remaining", "0".to_string())],
            );
        });
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(
            field(&events[0], "context"),
            Some(r#"[("reset", "in 15 min"), ("remaining", "0")]"#)
        );
    }

    #[test]
    fn debug_logging_follows_debug_mode() {
        let quiet = client(FakeTransport::replying(200, "{}"));
        assert!(!quiet.log_enabled(Level::DEBUG));
        assert!(quiet.log_enabled(Level::WARN));

        let loud = TwitterClient::new(
            Configuration::default().with_debug(true),
            FakeTransport::replying(200, "{}"),
        );
        assert!(loud.log_enabled(Level::DEBUG));
        // No subscriber installed: logging must still be harmless.
        loud.log(Level::DEBUG, "no subscriber", &[("k", "1".to_string())]);
    }
}
