//! # Fetchling - a well-mannered fetch helper
//!
//! Fetchling is a thin behavioral layer over `reqwest`. It adds three things
//! a plain transport call makes you hand-roll every time: JSON content
//! negotiation, automatic retries when a server answers
//! `429 Too Many Requests` with a `Retry-After` header, and opt-in errors on
//! unsuccessful status codes. Everything else rides on the transport
//! unchanged.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fetchling::{bind, Body, FetchOptions};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fetchling::Error> {
//!     // A bound entry point: these defaults apply to every call
//!     let api = bind(
//!         FetchOptions::new()
//!             .request_json(true)
//!             .retry_on_too_many_requests(true)
//!             .throw_on_error(true),
//!     );
//!
//!     // Resolve straight to typed JSON
//!     let widgets: serde_json::Value = api.json("https://api.example.com/widgets").await?;
//!     println!("{}", widgets);
//!
//!     // POST a JSON payload; per-call options merge onto the defaults
//!     let outcome = api
//!         .execute(
//!             "https://api.example.com/widgets",
//!             FetchOptions::new()
//!                 .send_json(true)
//!                 .body(Body::from(json!({ "name": "sprocket" }))),
//!         )
//!         .await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Content negotiation** - `request_json`/`return_json` add an
//!   `Accept: application/json` header, `send_json` serializes the body and
//!   sets `Content-Type`; a header the caller supplied is never overwritten
//! - **Rate-limit retries** - with `retry_on_too_many_requests`, a 429
//!   response is retried after the wait the server names in `Retry-After`
//!   (delay-seconds or HTTP-date); a 429 without a usable header is returned
//!   as-is
//! - **Opt-in status errors** - `throw_on_error` turns non-2xx terminal
//!   responses into [`Error::Status`], with the status line, headers, and
//!   body captured for debugging
//! - **Bound defaults** - [`bind`] produces an entry point with fixed
//!   defaults; call-time options shallow-merge on top, call-time keys win
//! - **Prepared requests** - hand over a ready-made `reqwest::Request` and
//!   it is sent exactly as built, no header or body rewriting
//! - **Structured logging** - request dispatch and retry waits are traced
//!   with `tracing`
//!
//! ## Retrying forever, on purpose
//!
//! The retry loop has no built-in ceiling: as long as the server keeps
//! answering 429 with a usable `Retry-After`, the call keeps waiting and
//! retrying. That is the honest reading of the header. Callers who need a
//! bound can opt into one per call or per binding:
//!
//! ```no_run
//! use fetchling::FetchOptions;
//! use std::time::Duration;
//!
//! let options = FetchOptions::new()
//!     .retry_on_too_many_requests(true)
//!     .max_retries(5)
//!     .max_retry_wait(Duration::from_secs(60));
//! ```
//!
//! Cancellation and overall deadlines stay with the caller (for example via
//! `tokio::time::timeout` around the call, or a per-attempt
//! [`timeout`](FetchOptions::timeout) pass-through).
//!
//! ## Error Handling
//!
//! Without `throw_on_error`, a call never fails on status alone - inspect
//! the returned response yourself:
//!
//! ```no_run
//! use fetchling::{execute, FetchOptions, Outcome};
//!
//! # async fn example() -> Result<(), fetchling::Error> {
//! let outcome = execute("https://api.example.com/widgets", FetchOptions::new()).await?;
//! if let Outcome::Response(response) = outcome {
//!     if !response.status().is_success() {
//!         eprintln!("server said {}", response.status());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Transport failures and JSON codec failures propagate unchanged; nothing
//! is caught, wrapped, or logged away inside the core.

mod client;
mod error;
mod options;
mod outcome;
mod retry;
mod target;

pub use client::{bind, execute, Fetcher};
pub use error::{Error, Result};
pub use options::{Body, FetchOptions};
pub use outcome::Outcome;
pub use target::{IntoTarget, Target};
