// API client module: a small blocking HTTP client for the two calls the
// CLI needs, posting a status and fetching the friends timeline. Every call
// is a single request/response with no retries.

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::timeline::error_payload;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

/// Default service host. `TWIT_API_URL` overrides it.
pub const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Longest status the service accepts, in characters.
pub const MAX_STATUS_CHARS: usize = 140;

const UPDATE_PATH: &str = "/statuses/update.json";
const FRIENDS_TIMELINE_PATH: &str = "/statuses/friends_timeline.xml";

/// A status text that passed length validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage(String);

/// Why a message was rejected before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    Empty,
    TooLong(usize),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::Empty => write!(f, "no message"),
            MessageError::TooLong(len) => write!(f, "too long message, {} chars", len),
        }
    }
}

impl std::error::Error for MessageError {}

impl StatusMessage {
    pub fn parse(text: &str) -> std::result::Result<Self, MessageError> {
        match text.chars().count() {
            0 => Err(MessageError::Empty),
            len if len > MAX_STATUS_CHARS => Err(MessageError::TooLong(len)),
            _ => Ok(StatusMessage(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The bits of the update response we look at. The body is only used for
/// logging, so every field is optional.
#[derive(Deserialize, Debug, Default)]
struct PostedStatus {
    id: Option<serde_json::Value>,
}

/// Blocking client holding the HTTP client, the service base URL and the
/// account credentials used for basic authentication.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Build a client against `base_url`. Redirects are not followed so a
    /// 3xx reply reaches the caller and counts as success.
    pub fn new(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(ApiClient {
            client,
            base_url,
            credentials,
        })
    }

    /// Create an ApiClient configured from the environment variable
    /// `TWIT_API_URL` or fall back to `https://twitter.com`.
    pub fn from_env(credentials: Credentials) -> Result<Self> {
        let base_url =
            std::env::var("TWIT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(credentials, base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authorization header for HTTP basic auth. The value is marked
    /// sensitive so it is left out of reqwest's debug output.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let raw = format!("{}:{}", self.credentials.username, self.credentials.password);
        let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw)))
            .map_err(|_| {
                Error::AuthenticationFailed("credentials cannot be sent in a header".into())
            })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Post `message` as a new status. Success and redirection replies are
    /// both accepted; any other reply becomes an error carrying its body.
    pub fn update_status(&self, message: &StatusMessage) -> Result<()> {
        let url = format!("{}{}", self.base_url, UPDATE_PATH);
        log::debug!("POST {} ({} chars)", UPDATE_PATH, message.char_count());

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .form(&[("status", message.as_str())])
            .send()?;

        let status = res.status();
        log::debug!("POST {} -> {}", UPDATE_PATH, status);
        if status.is_success() || status.is_redirection() {
            let body = res.text().unwrap_or_default();
            let posted: PostedStatus = serde_json::from_str(&body).unwrap_or_default();
            if let Some(id) = posted.id {
                log::info!("posted status {}", id);
            }
            return Ok(());
        }
        Err(error_for(status, res))
    }

    /// Fetch the friends timeline and return the raw XML body.
    ///
    /// A 401 is reported as `AuthenticationFailed`. Any other non-success
    /// reply is an error too: the `<error>` element the service sends is
    /// surfaced when present, otherwise `Http` with the status and body.
    pub fn recent_xml(&self) -> Result<String> {
        let url = format!("{}{}", self.base_url, FRIENDS_TIMELINE_PATH);
        log::debug!("GET {}", FRIENDS_TIMELINE_PATH);

        let res = self.client.get(&url).headers(self.auth_headers()?).send()?;

        let status = res.status();
        log::debug!("GET {} -> {}", FRIENDS_TIMELINE_PATH, status);
        if status == StatusCode::UNAUTHORIZED {
            return Err(error_for(status, res));
        }
        let body = res.text()?;
        if status.is_success() {
            return Ok(body);
        }
        match error_payload(&body) {
            Some(err) => Err(err),
            None => Err(Error::Http { status, body }),
        }
    }
}

fn error_for(status: StatusCode, res: Response) -> Error {
    let body = res.text().unwrap_or_else(|_| "".into());
    if status == StatusCode::UNAUTHORIZED {
        log::warn!("service rejected the credentials");
        return Error::AuthenticationFailed(body.trim().to_string());
    }
    Error::Http { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_is_rejected() {
        assert_eq!(StatusMessage::parse(""), Err(MessageError::Empty));
        assert_eq!(MessageError::Empty.to_string(), "no message");
    }

    #[test]
    fn test_too_long_message_reports_length() {
        let text = "a".repeat(141);
        let err = StatusMessage::parse(&text).unwrap_err();
        assert_eq!(err, MessageError::TooLong(141));
        assert_eq!(err.to_string(), "too long message, 141 chars");
    }

    #[test]
    fn test_boundary_lengths_are_accepted() {
        assert_eq!(StatusMessage::parse("a").unwrap().char_count(), 1);
        let max = "b".repeat(MAX_STATUS_CHARS);
        assert_eq!(StatusMessage::parse(&max).unwrap().as_str(), max);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_STATUS_CHARS);
        assert!(text.len() > MAX_STATUS_CHARS);
        assert_eq!(StatusMessage::parse(&text).unwrap().char_count(), MAX_STATUS_CHARS);
    }

    #[test]
    fn test_auth_header_is_basic_and_sensitive() {
        let api = ApiClient::new(Credentials::new("me", "secret"), "http://localhost/").unwrap();
        let headers = api.auth_headers().unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        // base64("me:secret")
        assert_eq!(value.to_str().unwrap(), "Basic bWU6c2VjcmV0");
        assert_eq!(api.base_url(), "http://localhost");
    }
}
