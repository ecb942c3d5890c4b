//! Request execution: option resolution, content negotiation, the
//! transport/retry loop, and finalization.
//!
//! The [`Fetcher`] type is a specialized entry point carrying a fixed set of
//! default options. The free functions [`execute`] and [`bind`] are the
//! one-shot and factory forms of the same machinery.

use crate::{retry, Error, FetchOptions, IntoTarget, Outcome, Result, Target};
use http::{header, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::SystemTime;
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// A bound entry point: a transport client plus a fixed set of default
/// options, shared cheaply across clones.
///
/// Each call shallow-merges its own options on top of the defaults (call-time
/// keys win, even when set to `false`) and executes in isolation: concurrent
/// calls on the same `Fetcher` share nothing but the immutable defaults and
/// the transport's connection pool.
///
/// # Examples
///
/// ```no_run
/// use fetchling::{bind, FetchOptions};
///
/// # async fn example() -> Result<(), fetchling::Error> {
/// let api = bind(
///     FetchOptions::new()
///         .request_json(true)
///         .retry_on_too_many_requests(true)
///         .throw_on_error(true),
/// );
///
/// let response = api.response("https://api.example.com/widgets").await?;
/// println!("status: {}", response.status());
///
/// let widgets: serde_json::Value = api.json("https://api.example.com/widgets").await?;
/// println!("{}", widgets);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    http: reqwest::Client,
    defaults: FetchOptions,
}

impl Fetcher {
    /// Creates a `Fetcher` with the given default options and a fresh
    /// transport client.
    ///
    /// The defaults are not validated here; a conflicting combination
    /// surfaces as an ordinary error on first use.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized. Use
    /// [`with_client`](Self::with_client) to supply a transport client built
    /// fallibly or with custom settings.
    pub fn new(defaults: FetchOptions) -> Self {
        Self::with_client(reqwest::Client::new(), defaults)
    }

    /// Creates a `Fetcher` on top of an existing transport client.
    ///
    /// Useful for sharing one connection pool across several bound entry
    /// points, or for transport-level settings (proxies, TLS, user agent)
    /// this crate deliberately does not own.
    pub fn with_client(http: reqwest::Client, defaults: FetchOptions) -> Self {
        Self {
            inner: Arc::new(FetcherInner { http, defaults }),
        }
    }

    /// Executes a call with per-call options merged onto the bound defaults.
    ///
    /// The shape of the resolved value follows the effective `return_json`
    /// option; see [`Outcome`]. When the shape is known at the call site,
    /// [`response`](Self::response) and [`json`](Self::json) say it in the
    /// signature instead.
    ///
    /// # Errors
    ///
    /// Transport failures propagate unchanged. [`Error::Status`] is raised
    /// only under `throw_on_error`, and a JSON parse failure only under
    /// `return_json`.
    pub async fn execute(
        &self,
        target: impl IntoTarget,
        overrides: FetchOptions,
    ) -> Result<Outcome> {
        let options = overrides.overlay(&self.inner.defaults);
        let response = self.terminal(target.into_target()?, &options).await?;

        if options.wants_return_json() {
            let text = response.text().await?;
            Ok(Outcome::Json(serde_json::from_str(&text)?))
        } else {
            Ok(Outcome::Response(response))
        }
    }

    /// Executes a call with the bound defaults alone.
    pub async fn call(&self, target: impl IntoTarget) -> Result<Outcome> {
        self.execute(target, FetchOptions::new()).await
    }

    /// Executes a call and resolves to the raw response, regardless of any
    /// bound `return_json` default.
    pub async fn response(&self, target: impl IntoTarget) -> Result<reqwest::Response> {
        let options = FetchOptions::new()
            .return_json(false)
            .overlay(&self.inner.defaults);
        self.terminal(target.into_target()?, &options).await
    }

    /// Executes a call and resolves to the response body deserialized into
    /// `T`, regardless of any bound `return_json` default.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fetchling::{bind, FetchOptions};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Widget {
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// # async fn example() -> Result<(), fetchling::Error> {
    /// let api = bind(FetchOptions::new().throw_on_error(true));
    /// let widget: Widget = api.json("https://api.example.com/widgets/1").await?;
    /// println!("{}: {}", widget.id, widget.name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn json<T: DeserializeOwned>(&self, target: impl IntoTarget) -> Result<T> {
        let options = FetchOptions::new()
            .return_json(true)
            .overlay(&self.inner.defaults);
        let response = self.terminal(target.into_target()?, &options).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Runs a call up to its terminal response: resolve the request, loop
    /// through the transport with rate-limit retries, and apply the
    /// `throw_on_error` status check.
    async fn terminal(&self, target: Target, options: &FetchOptions) -> Result<reqwest::Response> {
        let request = match target {
            // Already fully formed by the caller; negotiation is skipped.
            Target::Prepared(request) => request,
            Target::Url(url) => resolve(url, options)?,
        };

        let response = dispatch(&self.inner.http, request, options).await?;

        if options.wants_throw_on_error() && !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response)
    }
}

/// Returns a specialized entry point bound to a set of default options.
///
/// Call-time options shallow-merge onto the defaults, key-wise; a key present
/// at call time replaces the default even when it carries `false`.
///
/// # Examples
///
/// ```no_run
/// use fetchling::{bind, Body, FetchOptions, Outcome};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), fetchling::Error> {
/// let api = bind(FetchOptions::new().send_json(true).return_json(true));
///
/// // Resolves to the parsed JSON body of the POST response
/// let created = api
///     .execute(
///         "https://api.example.com/widgets",
///         FetchOptions::new().body(Body::from(json!({ "name": "sprocket" }))),
///     )
///     .await?;
/// assert!(matches!(created, Outcome::Json(_)));
///
/// // An explicit override wins over the bound default
/// let raw = api
///     .execute(
///         "https://api.example.com/widgets/1",
///         FetchOptions::new().return_json(false),
///     )
///     .await?;
/// assert!(matches!(raw, Outcome::Response(_)));
/// # Ok(())
/// # }
/// ```
pub fn bind(defaults: FetchOptions) -> Fetcher {
    Fetcher::new(defaults)
}

/// Executes a single call with the given options.
///
/// Builds a throwaway transport client; callers making repeated requests
/// should prefer [`bind`] and reuse the connection pool it carries.
///
/// # Examples
///
/// ```no_run
/// use fetchling::{execute, FetchOptions};
///
/// # async fn example() -> Result<(), fetchling::Error> {
/// let outcome = execute(
///     "https://api.example.com/widgets",
///     FetchOptions::new().return_json(true),
/// )
/// .await?;
/// println!("{:?}", outcome.json());
/// # Ok(())
/// # }
/// ```
pub async fn execute(target: impl IntoTarget, options: FetchOptions) -> Result<Outcome> {
    Fetcher::new(options).call(target).await
}

/// Builds the concrete request for a URL target: pass-through options plus
/// negotiated headers and the serialized body.
///
/// Pure with respect to the caller's options: defaults are applied to a new
/// header map, only for absent keys, and the caller's values always win.
fn resolve(mut url: Url, options: &FetchOptions) -> Result<reqwest::Request> {
    if let Some(query) = &options.query {
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
    }

    let mut headers = options.headers.clone().unwrap_or_default();

    if options.wants_request_json() || options.wants_return_json() {
        headers
            .entry(header::ACCEPT)
            .or_insert(HeaderValue::from_static(APPLICATION_JSON));
    }

    let sending_json = options.wants_send_json() && options.body.is_some();

    let method = match &options.method {
        Some(method) => method.clone(),
        None if sending_json => Method::POST,
        None => Method::GET,
    };

    let body = match &options.body {
        Some(body) if sending_json => {
            headers
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(APPLICATION_JSON));
            Some(reqwest::Body::from(body.to_json_text()?))
        }
        Some(body) => Some(body.clone().into_raw()),
        None => None,
    };

    let mut request = reqwest::Request::new(method, url);
    *request.headers_mut() = headers;
    *request.body_mut() = body;
    *request.timeout_mut() = options.timeout;
    Ok(request)
}

/// The transport/retry loop.
///
/// Headers and body are fixed before the loop begins; only the wait varies
/// per iteration. The loop exits on any response that is not a 429, on a 429
/// without a usable `Retry-After`, and on the opt-in retry bounds. There is
/// no built-in cap otherwise: a server that keeps asking is honored until the
/// caller's cancellation or timeout cuts in.
async fn dispatch(
    client: &reqwest::Client,
    mut request: reqwest::Request,
    options: &FetchOptions,
) -> Result<reqwest::Response> {
    let retry_enabled = options.wants_retry();
    let mut retries = 0usize;

    loop {
        let attempt_started = SystemTime::now();
        // A streaming body cannot be replayed; try_clone is None and the
        // first response becomes terminal.
        let replay = if retry_enabled {
            request.try_clone()
        } else {
            None
        };

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            retries = retries,
            "Executing HTTP request"
        );

        let response = client.execute(request).await?;

        if retry_enabled && response.status() == StatusCode::TOO_MANY_REQUESTS {
            let can_retry = options.max_retries.map_or(true, |cap| retries < cap);
            if let (Some(replay_request), true) = (replay, can_retry) {
                if let Some(delay) = retry::retry_after_delay(response.headers(), attempt_started)
                {
                    if options.max_retry_wait.map_or(true, |cap| delay <= cap) {
                        tracing::info!(
                            delay_ms = delay.as_millis() as u64,
                            retries = retries,
                            "Rate limited - honoring Retry-After before retrying"
                        );
                        tokio::time::sleep(delay).await;
                        retries += 1;
                        request = replay_request;
                        continue;
                    }
                }
            }
        }

        tracing::debug!(
            status = response.status().as_u16(),
            "Terminal HTTP response"
        );
        return Ok(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Body;
    use serde_json::json;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_resolve_plain_request_is_untouched() {
        let options = FetchOptions::new().body(Body::from("plain text"));
        let request = resolve(url("/echo"), &options).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert!(request.headers().is_empty());
        assert_eq!(
            request.body().unwrap().as_bytes().unwrap(),
            b"plain text"
        );
    }

    #[test]
    fn test_resolve_accept_header_for_json_requests() {
        for options in [
            FetchOptions::new().request_json(true),
            FetchOptions::new().return_json(true),
        ] {
            let request = resolve(url("/widgets"), &options).unwrap();
            assert_eq!(
                request.headers().get(header::ACCEPT).unwrap(),
                "application/json"
            );
        }
    }

    #[test]
    fn test_resolve_caller_accept_header_wins() {
        let options = FetchOptions::new()
            .request_json(true)
            .header("Accept", "text/calendar")
            .unwrap();
        let request = resolve(url("/widgets"), &options).unwrap();

        assert_eq!(
            request.headers().get(header::ACCEPT).unwrap(),
            "text/calendar"
        );
    }

    #[test]
    fn test_resolve_send_json_serializes_and_defaults_post() {
        let options = FetchOptions::new()
            .send_json(true)
            .body(Body::from(json!({ "Wednesday": "pink" })));
        let request = resolve(url("/widgets"), &options).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            request.body().unwrap().as_bytes().unwrap(),
            br#"{"Wednesday":"pink"}"#
        );
    }

    #[test]
    fn test_resolve_send_json_keeps_caller_method_and_content_type() {
        let options = FetchOptions::new()
            .send_json(true)
            .method(Method::PUT)
            .header("content-type", "application/json; charset=utf-8")
            .unwrap()
            .body(Body::from(json!({ "a": 1 })));
        let request = resolve(url("/widgets/1"), &options).unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(
            request.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_resolve_send_json_without_body_changes_nothing() {
        let options = FetchOptions::new().send_json(true);
        let request = resolve(url("/widgets"), &options).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert!(request.headers().get(header::CONTENT_TYPE).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn test_resolve_appends_query_params() {
        let options = FetchOptions::new()
            .query_param("page", "1")
            .query_param("limit", "10");
        let request = resolve(url("/widgets"), &options).unwrap();

        assert_eq!(request.url().query(), Some("page=1&limit=10"));
    }
}
