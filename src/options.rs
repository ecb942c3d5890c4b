//! Per-call configuration: recognized options and pass-through transport options.
//!
//! [`FetchOptions`] is a flat set of options where every field distinguishes
//! "explicitly set" from "absent". That distinction is what makes
//! [`bind`](crate::bind) work: call-time options are shallow-merged onto the
//! bound defaults key-wise, and a key that is present (even when it carries
//! `false`) replaces the default.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;

/// A request payload.
///
/// Only a [`Body::Json`] or [`Body::Text`] payload can be rewritten by
/// `send_json`; a [`Body::Bytes`] payload is raw and always passes through
/// unchanged.
#[derive(Debug, Clone)]
pub enum Body {
    /// A JSON value, serialized to its text form when the request is built.
    Json(serde_json::Value),
    /// A plain text payload.
    Text(String),
    /// A raw byte payload.
    Bytes(Vec<u8>),
}

impl Body {
    /// Builds a JSON body from any serializable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use fetchling::Body;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Widget { name: String }
    ///
    /// let body = Body::json(&Widget { name: "sprocket".to_string() }).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON
    /// (for example, a map with non-string keys).
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// The JSON text form of this body, used when `send_json` is enabled.
    ///
    /// A text body is encoded as a JSON string literal, so `hello` becomes
    /// `"hello"`. A byte body has no JSON form and fails.
    pub(crate) fn to_json_text(&self) -> Result<String> {
        match self {
            Body::Json(value) => Ok(serde_json::to_string(value)?),
            Body::Text(text) => Ok(serde_json::to_string(text)?),
            Body::Bytes(_) => Err(Error::Configuration(
                "A raw byte body cannot be serialized as JSON".to_string(),
            )),
        }
    }

    /// The unmodified byte form of this body, used when `send_json` is off.
    ///
    /// A JSON body has exactly one byte representation, its compact text.
    pub(crate) fn into_raw(self) -> reqwest::Body {
        match self {
            Body::Json(value) => reqwest::Body::from(value.to_string()),
            Body::Text(text) => reqwest::Body::from(text),
            Body::Bytes(bytes) => reqwest::Body::from(bytes),
        }
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

/// Options for a single call, or defaults for a bound [`Fetcher`](crate::Fetcher).
///
/// The recognized options steer how the request is built and how the final
/// value is shaped; they are never forwarded to the transport. Everything
/// else (method, headers, query parameters, timeout) is a pass-through
/// transport option and reaches `reqwest` verbatim.
///
/// All setters are chainable and mark the option as present, which matters
/// for [`bind`](crate::bind): an explicit `.return_json(false)` at call time
/// overrides a bound `return_json: true` default, while an untouched option
/// inherits it.
///
/// # Examples
///
/// ```
/// use fetchling::{Body, FetchOptions};
/// use serde_json::json;
///
/// let options = FetchOptions::new()
///     .send_json(true)
///     .return_json(true)
///     .retry_on_too_many_requests(true)
///     .body(Body::from(json!({ "name": "sprocket" })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub(crate) body: Option<Body>,
    pub(crate) request_json: Option<bool>,
    pub(crate) retry_on_too_many_requests: Option<bool>,
    pub(crate) return_json: Option<bool>,
    pub(crate) send_json: Option<bool>,
    pub(crate) throw_on_error: Option<bool>,
    pub(crate) max_retries: Option<usize>,
    pub(crate) max_retry_wait: Option<Duration>,
    pub(crate) method: Option<Method>,
    pub(crate) headers: Option<HeaderMap>,
    pub(crate) query: Option<Vec<(String, String)>>,
    pub(crate) timeout: Option<Duration>,
}

impl FetchOptions {
    /// Creates an empty option set. Every option is absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request payload.
    ///
    /// The payload is serialized to JSON text only when `send_json` is also
    /// enabled; otherwise its bytes pass through to the transport unchanged.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self> {
        self.body = Some(Body::json(value)?);
        Ok(self)
    }

    /// Asks the server for JSON: an `Accept: application/json` header is
    /// added unless the caller already supplied an `Accept` header.
    pub fn request_json(mut self, enabled: bool) -> Self {
        self.request_json = Some(enabled);
        self
    }

    /// Retries the call when the server answers `429 Too Many Requests` with
    /// a usable `Retry-After` header.
    ///
    /// Retries continue for as long as the server keeps asking; see
    /// [`max_retries`](Self::max_retries) and
    /// [`max_retry_wait`](Self::max_retry_wait) to bound them.
    pub fn retry_on_too_many_requests(mut self, enabled: bool) -> Self {
        self.retry_on_too_many_requests = Some(enabled);
        self
    }

    /// Resolves to the parsed JSON body instead of the raw response.
    ///
    /// Also implies the `Accept: application/json` default, as with
    /// [`request_json`](Self::request_json).
    pub fn return_json(mut self, enabled: bool) -> Self {
        self.return_json = Some(enabled);
        self
    }

    /// Serializes the body to JSON text, defaults the method to `POST` when
    /// none was given, and adds a `Content-Type: application/json` header
    /// unless the caller already supplied a `Content-Type`.
    pub fn send_json(mut self, enabled: bool) -> Self {
        self.send_json = Some(enabled);
        self
    }

    /// Fails with [`Error::Status`] when the terminal response status is
    /// outside the 2xx range.
    pub fn throw_on_error(mut self, enabled: bool) -> Self {
        self.throw_on_error = Some(enabled);
        self
    }

    /// Caps the number of rate-limit retries.
    ///
    /// Absent by default: the call keeps retrying for as long as the server
    /// keeps answering 429 with a usable `Retry-After`.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Caps a single `Retry-After` wait. A 429 whose honored delay would
    /// exceed the cap is treated as terminal instead of slept on.
    ///
    /// Absent by default: the server's delay is honored however long it is.
    pub fn max_retry_wait(mut self, wait: Duration) -> Self {
        self.max_retry_wait = Some(wait);
        self
    }

    /// Sets the HTTP method (pass-through).
    ///
    /// When absent, the method is `GET`, or `POST` when `send_json` is
    /// enabled and a body is present.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds a request header (pass-through).
    ///
    /// Caller-supplied headers always win over the `Accept` and
    /// `Content-Type` defaults; header names compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .insert(name, value);
        Ok(self)
    }

    /// Replaces the whole request header map (pass-through).
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Adds a query parameter to the request URL (pass-through).
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Sets a timeout for each transport attempt (pass-through).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shallow-merges these options onto `defaults`, key-wise.
    ///
    /// A key present here wins even when it is `false`; a key absent here
    /// inherits the default. The `headers` and `query` collections are keys
    /// like any other and replace wholesale, they are not unioned.
    pub(crate) fn overlay(self, defaults: &FetchOptions) -> FetchOptions {
        FetchOptions {
            body: self.body.or_else(|| defaults.body.clone()),
            request_json: self.request_json.or(defaults.request_json),
            retry_on_too_many_requests: self
                .retry_on_too_many_requests
                .or(defaults.retry_on_too_many_requests),
            return_json: self.return_json.or(defaults.return_json),
            send_json: self.send_json.or(defaults.send_json),
            throw_on_error: self.throw_on_error.or(defaults.throw_on_error),
            max_retries: self.max_retries.or(defaults.max_retries),
            max_retry_wait: self.max_retry_wait.or(defaults.max_retry_wait),
            method: self.method.or_else(|| defaults.method.clone()),
            headers: self.headers.or_else(|| defaults.headers.clone()),
            query: self.query.or_else(|| defaults.query.clone()),
            timeout: self.timeout.or(defaults.timeout),
        }
    }

    pub(crate) fn wants_request_json(&self) -> bool {
        self.request_json.unwrap_or(false)
    }

    pub(crate) fn wants_return_json(&self) -> bool {
        self.return_json.unwrap_or(false)
    }

    pub(crate) fn wants_send_json(&self) -> bool {
        self.send_json.unwrap_or(false)
    }

    pub(crate) fn wants_throw_on_error(&self) -> bool {
        self.throw_on_error.unwrap_or(false)
    }

    pub(crate) fn wants_retry(&self) -> bool {
        self.retry_on_too_many_requests.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_present_key_wins() {
        let defaults = FetchOptions::new().return_json(true).send_json(true);
        let overrides = FetchOptions::new().return_json(false);

        let merged = overrides.overlay(&defaults);

        assert_eq!(merged.return_json, Some(false));
        assert_eq!(merged.send_json, Some(true));
    }

    #[test]
    fn test_overlay_absent_key_inherits() {
        let defaults = FetchOptions::new()
            .throw_on_error(true)
            .timeout(Duration::from_secs(5));
        let merged = FetchOptions::new().overlay(&defaults);

        assert_eq!(merged.throw_on_error, Some(true));
        assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
        assert_eq!(merged.retry_on_too_many_requests, None);
    }

    #[test]
    fn test_overlay_headers_replace_wholesale() {
        let defaults = FetchOptions::new()
            .header("x-default", "yes")
            .unwrap()
            .header("authorization", "token abc")
            .unwrap();
        let overrides = FetchOptions::new().header("x-override", "yes").unwrap();

        let merged = overrides.overlay(&defaults);
        let headers = merged.headers.unwrap();

        assert!(headers.contains_key("x-override"));
        assert!(!headers.contains_key("x-default"));
        assert!(!headers.contains_key("authorization"));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let result = FetchOptions::new().header("not a header", "value");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_body_json_text_forms() {
        let json_body = Body::from(json!({ "a": 1 }));
        assert_eq!(json_body.to_json_text().unwrap(), r#"{"a":1}"#);

        let text_body = Body::from("hello");
        assert_eq!(text_body.to_json_text().unwrap(), r#""hello""#);

        let byte_body = Body::from(vec![0u8, 1, 2]);
        assert!(matches!(
            byte_body.to_json_text(),
            Err(Error::Configuration(_))
        ));
    }
}
