//! Example demonstrating rate-limit retries and status errors.
//!
//! This example shows how to:
//! - Retry on 429 responses that carry a Retry-After header
//! - Bound the retry loop when waiting forever is not an option
//! - Turn non-2xx terminal responses into errors
//!
//! Run with: `cargo run --example rate_limit_retry`

use fetchling::{bind, Error, FetchOptions};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("fetchling=debug")
        .init();

    println!("=== Honoring Retry-After ===");
    println!("With retry_on_too_many_requests, a 429 that names a wait is");
    println!("slept on and retried; a 429 without one is returned as-is.\n");

    let api = bind(
        FetchOptions::new()
            .request_json(true)
            .retry_on_too_many_requests(true)
            // Without these two, the loop trusts the server indefinitely
            .max_retries(3)
            .max_retry_wait(Duration::from_secs(30)),
    );

    match api
        .response("https://api.github.com/rate_limit")
        .await
    {
        Ok(response) => {
            println!("Status: {}", response.status());
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("?")
                .to_string();
            println!("Remaining API calls: {}", remaining);
        }
        Err(e) => println!("Request failed: {}", e),
    }
    println!();

    println!("=== Status errors on demand ===");
    let strict = bind(FetchOptions::new().throw_on_error(true));

    match strict
        .response("https://jsonplaceholder.typicode.com/nope")
        .await
    {
        Ok(response) => println!("Unexpected success: {}", response.status()),
        Err(Error::Status {
            status,
            status_text,
            body,
            ..
        }) => {
            println!("Server said {} {}", status.as_u16(), status_text);
            println!("Body: {}", body);
        }
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}
