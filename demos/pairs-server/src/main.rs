//! Runnable matching-pairs server with the stock eight-pair board.
//!
//! Listens on `$PORT` (default 5000). Log verbosity via `RUST_LOG`,
//! e.g. `RUST_LOG=flipmatch=debug`.

use flipmatch::FlipmatchServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let server = FlipmatchServer::builder()
        .bind(&format!("0.0.0.0:{port}"))
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "pairs server listening");
    server.run().await?;
    Ok(())
}
