// Error type shared by the API client and the timeline parser. The binary
// wraps these in `anyhow` so a failure ends the command with one diagnostic.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The service rejected the stored credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    /// Any non-success, non-redirect response to a status update.
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("request failed")]
    Transport(#[from] reqwest::Error),
    #[error("malformed timeline XML")]
    Xml(#[from] roxmltree::Error),
    /// An `<error>` payload other than an authentication failure.
    #[error("service returned an error: {0}")]
    Api(String),
    /// A well-formed document that is neither a timeline nor an error.
    #[error("unexpected timeline document <{0}>")]
    UnexpectedRoot(String),
    #[error("status entry is missing <{0}>")]
    MissingField(&'static str),
}
