mod app_state;
mod config;
mod error;
mod handlers;
mod lightning;
mod lnurl;
mod users;

use anyhow::Context;
use axum::{Router, routing::get};
use clap::Parser;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_state::AppState;
use config::Config;
use handlers::{lnurl as lnurl_handlers, lnurlp};
use lightning::LndRestBackend;
use users::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from .env never override the real environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightning_address_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration
    let config = Arc::new(Config::parse());

    // Load users
    let users = match &config.users_file {
        Some(path) => UserStore::load(path)
            .with_context(|| format!("Failed to load users from {}", path.display()))?,
        None => {
            tracing::warn!("No users file configured, serving built-in users");
            UserStore::builtin()
        }
    };

    check_lnurls(&config, &users)?;

    let lnd = LndRestBackend::from_config(&config)?;
    tracing::info!("LND invoices endpoint: {}", lnd.invoices_url());
    let lightning: Arc<dyn lightning::LightningBackend> = Arc::new(lnd);

    let state = AppState {
        config: config.clone(),
        users: Arc::new(users),
        lightning,
    };

    let app = app(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.socket_addr()).await?;

    tracing::info!("Lightning Address server running on {}", config.socket_addr());
    tracing::info!("Backend URL: {}", config.backend_url);
    let mut names: Vec<_> = state.users.usernames().collect();
    names.sort_unstable();
    tracing::info!("Serving {} user(s): {}", names.len(), names.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // LUD-16 discovery
        .route("/.well-known/lnurlp/{username}", get(lnurlp::pay_request))
        // LNURL-pay callback
        .route("/api/callback/{username}", get(lnurlp::callback))
        // Utility
        .route("/api/getLnurl/{username}", get(lnurl_handlers::get_lnurl))
        .fallback(handlers::not_found)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        // Add shared state
        .with_state(state)
}

/// Every user's discovery URL must survive the LNURL round trip, otherwise
/// getLnurl would hand out something wallets cannot resolve.
fn check_lnurls(config: &Config, users: &UserStore) -> anyhow::Result<()> {
    for username in users.usernames() {
        let url = config.pay_request_url(username);
        let encoded = lnurl::encode_lnurl(&url)?;
        let decoded = lnurl::decode_lnurl(&encoded)?;
        anyhow::ensure!(decoded == url, "LNURL for {} does not decode to {}", username, url);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
