//! Example to run the NOUGHTS server standalone
//!
//! Run with: cargo run -p noughts-server --example run_server

use noughts_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("noughts=info".parse()?))
        .init();

    let config = ServerConfig::default();

    println!("Starting NOUGHTS server on port {}", config.port);
    println!("Try: curl http://localhost:{}/api/status", config.port);

    run_server(config).await
}
