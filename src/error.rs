//! Error types for request execution.
//!
//! This module provides error types that preserve maximum debugging information
//! while remaining ergonomic to use. Status errors capture the terminal response
//! (status line, headers, and body text) at the moment they are raised.

use http::{HeaderMap, StatusCode};

/// The main error type for request execution.
///
/// Most of the time a failed call surfaces the transport's own error unchanged.
/// The one error this crate raises itself is [`Error::Status`], and only when
/// `throw_on_error` is enabled on the call.
///
/// # Examples
///
/// ```no_run
/// use fetchling::{execute, Error, FetchOptions};
///
/// # async fn example() -> Result<(), Error> {
/// let options = FetchOptions::new().throw_on_error(true);
///
/// match execute("https://api.example.com/widgets", options).await {
///     Ok(outcome) => println!("Success: {:?}", outcome),
///     Err(Error::Status { status, body, .. }) => {
///         eprintln!("Server said {}: {}", status, body);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A transport-level failure (connection refused, DNS lookup failed,
    /// request timed out, body read interrupted).
    ///
    /// This wraps the underlying `reqwest::Error` and is never retried or
    /// remapped by this crate.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The terminal response had a non-2xx status and `throw_on_error` was
    /// enabled.
    ///
    /// The message is the status line of the response (`"500 Internal Server
    /// Error"`). The response itself cannot outlive the error, so its parts
    /// are captured here instead: status, canonical status text, headers, and
    /// the body read as text.
    #[error("{} {}", .status.as_u16(), .status_text)]
    Status {
        /// The HTTP status code of the terminal response.
        status: StatusCode,
        /// The canonical reason phrase for the status (empty if unknown).
        status_text: String,
        /// The response headers.
        headers: HeaderMap,
        /// The response body, read as text (empty if unreadable).
        body: String,
    },

    /// A JSON codec failure, surfaced unchanged.
    ///
    /// Raised when `send_json` is enabled and the request body cannot be
    /// serialized, or when `return_json` is enabled and the response body is
    /// not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An invalid URL was given as the request target.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration was provided, such as a malformed header name or
    /// a body that cannot be expressed in the requested encoding.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Captures a terminal response as a [`Error::Status`] value.
    ///
    /// Reading the body consumes the response, which is fine here: the
    /// response is already lost to the caller once the error is raised.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        Error::Status {
            status,
            status_text,
            headers,
            body,
        }
    }

    /// Returns the HTTP status code if this error carries one.
    ///
    /// # Examples
    ///
    /// ```
    /// use fetchling::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Status {
    ///     status: StatusCode::INTERNAL_SERVER_ERROR,
    ///     status_text: "Internal Server Error".to_string(),
    ///     headers: http::HeaderMap::new(),
    ///     body: String::new(),
    /// };
    ///
    /// assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the captured response body if this error carries one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// A specialized `Result` type for request execution.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
