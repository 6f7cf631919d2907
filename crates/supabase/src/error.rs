//! Errors from the Supabase HTTP APIs.

use queens_beauty_core::GatewayError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The addressed row or object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials or token were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by Supabase.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<SupabaseError> for GatewayError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Http(e) => Self::Transport(e.to_string()),
            SupabaseError::Api { status, message } => Self::Status { status, message },
            SupabaseError::Parse(e) => Self::Decode(e.to_string()),
            SupabaseError::NotFound(what) => Self::NotFound(what),
            SupabaseError::Unauthorized(msg) => Self::Unauthorized(msg),
            SupabaseError::RateLimited(secs) => Self::RateLimited(secs),
            SupabaseError::InvalidUrl(msg) => Self::Transport(msg),
        }
    }
}

/// Error body shapes used across PostgREST, Storage and GoTrue.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    hint: Option<String>,
}

/// Map a non-success response to an error, extracting the most useful message.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &str) -> SupabaseError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let mut message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| body.chars().take(200).collect());
    if let Some(hint) = parsed.hint {
        message = format!("{message} (hint: {hint})");
    }

    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            SupabaseError::Unauthorized(message)
        }
        reqwest::StatusCode::NOT_FOUND => SupabaseError::NotFound(message),
        _ => SupabaseError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
