//! Basic example demonstrating one-shot and bound calls.
//!
//! This example shows how to:
//! - Execute a single request with call-time options
//! - Bind a set of default options and reuse it
//! - Read the raw response or resolve straight to JSON
//!
//! Run with: `cargo run --example basic_fetch`

use fetchling::{bind, execute, FetchOptions, Outcome};

#[tokio::main]
async fn main() -> Result<(), fetchling::Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("fetchling=debug,basic_fetch=info")
        .init();

    println!("=== One-shot call ===");
    let outcome = execute(
        "https://jsonplaceholder.typicode.com/posts/1",
        FetchOptions::new().request_json(true),
    )
    .await?;

    if let Outcome::Response(response) = outcome {
        println!("Status: {}", response.status());
        println!("Content-Type: {:?}", response.headers().get("content-type"));
        println!("Body: {}", response.text().await.unwrap_or_default());
    }
    println!();

    println!("=== Bound entry point ===");
    // These defaults apply to every call made through `api`
    let api = bind(
        FetchOptions::new()
            .request_json(true)
            .throw_on_error(true),
    );

    let post: serde_json::Value = api
        .json("https://jsonplaceholder.typicode.com/posts/2")
        .await?;
    println!("Post title: {}", post["title"]);

    let response = api
        .response("https://jsonplaceholder.typicode.com/posts/3")
        .await?;
    println!("Raw response status: {}", response.status());

    Ok(())
}
