//! The final value of a call: a raw response, or its parsed JSON body.

use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// What a call resolves to.
///
/// The variant is decided by the effective `return_json` option of the call:
/// off (the default) yields the raw transport response, on yields the body
/// already parsed as JSON. Callers who know the shape at the call site can
/// use [`Fetcher::response`](crate::Fetcher::response) or
/// [`Fetcher::json`](crate::Fetcher::json) instead and skip the match.
///
/// # Examples
///
/// ```no_run
/// use fetchling::{execute, FetchOptions, Outcome};
///
/// # async fn example() -> Result<(), fetchling::Error> {
/// match execute("https://api.example.com/widgets", FetchOptions::new().return_json(true)).await? {
///     Outcome::Json(value) => println!("widgets: {}", value),
///     Outcome::Response(response) => println!("status: {}", response.status()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub enum Outcome {
    /// The raw response, body unread. The usual reading operations
    /// (`text()`, `json()`, `bytes()`) remain available on it.
    Response(reqwest::Response),
    /// The response body, parsed as JSON.
    Json(serde_json::Value),
}

impl Outcome {
    /// Returns the raw response, or `None` for a parsed-JSON outcome.
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self {
            Outcome::Response(response) => Some(response),
            Outcome::Json(_) => None,
        }
    }

    /// Returns the parsed JSON body, or `None` for a raw-response outcome.
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Outcome::Json(value) => Some(value),
            Outcome::Response(_) => None,
        }
    }

    /// Borrows the parsed JSON body, if this is a parsed-JSON outcome.
    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            Outcome::Json(value) => Some(value),
            Outcome::Response(_) => None,
        }
    }

    /// Deserializes the parsed JSON body into a typed value.
    ///
    /// # Errors
    ///
    /// Fails with a deserialization error if the body does not match `T`,
    /// or a configuration error if the call was made without `return_json`
    /// and this outcome is a raw response.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Outcome::Json(value) => Ok(serde_json::from_value(value)?),
            Outcome::Response(_) => Err(Error::Configuration(
                "Outcome is a raw response; enable return_json to parse it".to_string(),
            )),
        }
    }
}
