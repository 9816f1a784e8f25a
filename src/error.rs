//! Error types for analytics-report

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while authorizing, fetching or decoding a report
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read key file {}: {source}", .path.display())]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign JWT assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token exchange failed with HTTP {status}: {message}")]
    TokenExchange { status: StatusCode, message: String },

    #[error("Access token cannot be used as a header value")]
    MalformedToken,

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Analytics Reporting API returned HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Did not get expected HTTP response code: {0}")]
    UnexpectedStatus(StatusCode),
}

impl Error {
    /// Whether the error was caused by local configuration rather than the remote side
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Credentials { .. } | Error::InvalidKey(_) | Error::InvalidUrl(_)
        )
    }

    /// HTTP status code attached to the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::TokenExchange { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::UnexpectedStatus(status) => Some(*status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }
}
