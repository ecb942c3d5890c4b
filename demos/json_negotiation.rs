//! Example demonstrating JSON content negotiation and body serialization.
//!
//! This example shows how to:
//! - POST a JSON payload with `send_json`
//! - Resolve to the parsed body with `return_json`
//! - Keep control of headers the crate would otherwise default
//!
//! Run with: `cargo run --example json_negotiation`

use fetchling::{bind, Body, FetchOptions};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Created {
    id: u32,
}

#[tokio::main]
async fn main() -> Result<(), fetchling::Error> {
    tracing_subscriber::fmt()
        .with_env_filter("fetchling=debug")
        .init();

    let api = bind(
        FetchOptions::new()
            .send_json(true)
            .return_json(true)
            .throw_on_error(true),
    );

    println!("=== POST a JSON payload ===");
    // send_json serializes the body, defaults the method to POST, and sets
    // Content-Type: application/json
    let outcome = api
        .execute(
            "https://jsonplaceholder.typicode.com/posts",
            FetchOptions::new().body(Body::from(json!({
                "title": "fetchling",
                "body": "a well-mannered fetch helper",
                "userId": 1,
            }))),
        )
        .await?;

    let created: Created = outcome.parse()?;
    println!("Created post with ID: {}", created.id);
    println!();

    println!("=== Caller headers always win ===");
    // The explicit charset survives; send_json only fills the header in
    // when the caller left it out
    let outcome = api
        .execute(
            "https://jsonplaceholder.typicode.com/posts",
            FetchOptions::new()
                .header("Content-Type", "application/json; charset=utf-8")?
                .body(Body::from(json!({ "title": "charset kept" }))),
        )
        .await?;
    println!("Outcome: {:?}", outcome);

    Ok(())
}
