//! Blocking `HttpTransport` over ureq.
//!
//! Status codes are never turned into errors here (`http_status_as_error`
//! is off); the dispatcher owns that decision.

use std::fmt;
use std::time::Duration;

use ureq::http::{HeaderName, HeaderValue};
use ureq::unversioned::multipart::Form;
use ureq::Agent;
use url::form_urlencoded;

use crate::client::TwitterClient;
use crate::config::Configuration;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError};

const USER_AGENT: &str = concat!("twitter-core/", env!("CARGO_PKG_VERSION"));

/// `HttpTransport` backed by a shared ureq `Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url_with_query();
        let mut response = match (request.method, &request.body) {
            (HttpMethod::Get, _) => self.agent.get(&url).header("User-Agent", USER_AGENT).call()?,
            (HttpMethod::Post, None) => self
                .agent
                .post(&url)
                .header("User-Agent", USER_AGENT)
                .send_empty()?,
            (HttpMethod::Post, Some(RequestBody::Form(fields))) => {
                let body = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish();
                self.agent
                    .post(&url)
                    .header("User-Agent", USER_AGENT)
                    .content_type("application/x-www-form-urlencoded")
                    .send(body.as_bytes())?
            }
            (HttpMethod::Post, Some(RequestBody::Multipart(fields))) => {
                let names: Vec<String> =
                    fields.iter().map(|(name, _)| quote_field_name(name)).collect();
                let form = names
                    .iter()
                    .zip(fields)
                    .fold(Form::new(), |form, (name, (_, value))| form.text(name, value));
                self.agent
                    .post(&url)
                    .header("User-Agent", USER_AGENT)
                    .send(form)?
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Header values outside visible ASCII are decoded lossily, not dropped.
fn header_pair(name: &HeaderName, value: &HeaderValue) -> (String, String) {
    (
        name.as_str().to_string(),
        String::from_utf8_lossy(value.as_bytes()).into_owned(),
    )
}

/// Field name as it goes inside the quoted `name="..."` parameter of a
/// part's `Content-Disposition`. Quotes are backslash-escaped and line breaks
/// percent-encoded so a name can never end the parameter early.
fn quote_field_name(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\r' => quoted.push_str("%0D"),
            '\n' => quoted.push_str("%0A"),
            c => quoted.push(c),
        }
    }
    quoted
}

impl TwitterClient<UreqTransport> {
    /// Client over a ureq agent honouring `config.timeout_secs`.
    pub fn with_ureq(config: Configuration) -> Self {
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_secs));
        TwitterClient::new(config, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_field_names_are_untouched() {
        assert_eq!(quote_field_name("media_data"), "media_data");
    }

    #[test]
    fn quotes_and_line_breaks_cannot_close_the_name() {
        assert_eq!(
            quote_field_name("alt\"; filename=\"x.bin"),
            r#"alt\"; filename=\"x.bin"#
        );
        assert_eq!(quote_field_name("a\r\nb"), "a%0D%0Ab");
    }

    #[test]
    fn non_ascii_header_values_survive() {
        let name = HeaderName::from_static("x-location");
        let value = HeaderValue::from_bytes("Zürich".as_bytes()).unwrap();
        assert!(value.to_str().is_err());
        assert_eq!(
            header_pair(&name, &value),
            ("x-location".to_string(), "Zürich".to_string())
        );
    }

    #[test]
    fn with_ureq_keeps_configuration() {
        let client = TwitterClient::with_ureq(Configuration::default().with_debug(true));
        assert!(client.config().debug_mode);
    }
}
