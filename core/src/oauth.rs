//! Three-legged OAuth token exchange.
//!
//! Signing requests is the session's job; this module only knows which
//! endpoint to call, which parameter to send, and how to read the
//! form-encoded token response.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};
use crate::types::Params;

/// Token endpoints of the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub request_token_url: String,
    pub access_token_url: String,
    pub authorize_url: String,
    pub authenticate_url: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            request_token_url: "https://api.twitter.com/oauth/request_token".to_string(),
            access_token_url: "https://api.twitter.com/oauth/access_token".to_string(),
            authorize_url: "https://api.twitter.com/oauth/authorize".to_string(),
            authenticate_url: "https://api.twitter.com/oauth/authenticate".to_string(),
        }
    }
}

/// An OAuth-signing HTTP session.
pub trait OAuthSession {
    fn endpoints(&self) -> &OAuthEndpoints;

    /// Send a signed request and return the response whatever its status.
    fn request(&self, method: HttpMethod, url: &str, params: &Params) -> Result<HttpResponse, ApiError>;

    /// Switch the session to the given user token pair.
    fn reconfigure(&mut self, token: &str, secret: &str);
}

/// A token pair plus whatever else the endpoint returned (`user_id`,
/// `screen_name`, `oauth_callback_confirmed`...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub extra: BTreeMap<String, String>,
}

impl OAuthToken {
    /// Parse a form-encoded token response. `None` unless both halves of
    /// the pair are present.
    pub fn parse(body: &str) -> Option<Self> {
        let mut fields: BTreeMap<String, String> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        let oauth_token = fields.remove("oauth_token")?;
        let oauth_token_secret = fields.remove("oauth_token_secret")?;
        Some(Self {
            oauth_token,
            oauth_token_secret,
            extra: fields,
        })
    }
}

/// Fetch a request token. `callback` is where the user lands after
/// authorizing the app.
pub fn request_token<S: OAuthSession>(session: &S, callback: Option<&str>) -> Result<OAuthToken, ApiError> {
    let mut params = Params::new();
    if let Some(cb) = callback.filter(|cb| !cb.is_empty()) {
        params.insert("oauth_callback", cb);
    }
    let url = session.endpoints().request_token_url.clone();
    let response = session.request(HttpMethod::Get, &url, &params)?;
    token_from_response(response)
}

/// Exchange the verifier for an access token and switch `session` to it.
pub fn access_token<S: OAuthSession>(session: &mut S, verifier: Option<&str>) -> Result<OAuthToken, ApiError> {
    let mut params = Params::new();
    if let Some(v) = verifier.filter(|v| !v.is_empty()) {
        params.insert("oauth_verifier", v);
    }
    let url = session.endpoints().access_token_url.clone();
    let response = session.request(HttpMethod::Get, &url, &params)?;
    let token = token_from_response(response)?;
    session.reconfigure(&token.oauth_token, &token.oauth_token_secret);
    Ok(token)
}

/// URL to send the user to for authorization.
///
/// `force_login` wins over `sign_in_with_twitter`; signing in uses the
/// authenticate endpoint, plain authorization the authorize endpoint.
pub fn authorize_url(
    endpoints: &OAuthEndpoints,
    token: &str,
    sign_in_with_twitter: bool,
    force_login: bool,
) -> String {
    let token: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
    if force_login {
        format!("{}?oauth_token={token}&force_login=true", endpoints.authenticate_url)
    } else if !sign_in_with_twitter {
        format!("{}?oauth_token={token}", endpoints.authorize_url)
    } else {
        format!("{}?oauth_token={token}", endpoints.authenticate_url)
    }
}

fn token_from_response(response: HttpResponse) -> Result<OAuthToken, ApiError> {
    let token = (response.status == 200)
        .then(|| OAuthToken::parse(&response.body))
        .flatten();
    token.ok_or(ApiError::TokenExchange {
        status: response.status,
        body: response.body,
    })
}
