//! Token Gateway - Simple API with Authentication
//! Mission: Trade credentials for bearer tokens, tokens for users

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use token_gateway::{auth::AuthState, create_router, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 Simple API with Authentication starting");

    let config = Config::from_env().context("Invalid configuration")?;
    info!("⚙️  Loaded configuration: {:?}", config);

    if config.uses_default_secret() {
        warn!("⚠️  Signing with the built-in default SECRET_KEY, set one in production");
    }

    let auth_state = AuthState::from_config(&config);
    info!(
        "🔐 Authentication initialized ({:?}, {}m tokens)",
        config.algorithm, config.access_token_expire_minutes
    );

    let app = create_router(auth_state, &config.api_prefix);

    // Start server
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        "🎯 API server listening on {}{}",
        config.bind_addr, config.api_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");

    Ok(())
}

/// Initialize tracing, overridable through RUST_LOG
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate root .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received");
}
