/**
 * restfeed Server Entry Point
 *
 * Registers the resources listed in the configuration over an in-memory
 * store and serves them.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = restfeed::backend::server::load_config()?;
    let store = Arc::new(restfeed::backend::MemoryStore::new());
    let registry = restfeed::backend::server::build_registry(&config, store).await?;

    let addr = config.bind_address();
    let app = restfeed::backend::server::create_app(registry, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("[STARTUP] Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin restfeed-server --features ssr");
    std::process::exit(1);
}
