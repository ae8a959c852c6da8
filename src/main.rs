use anyhow::Result;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use translate402::{
    config::Config,
    handlers::{router, AppState},
    services::{PaymentGate, ProofCache, SystemClock},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting translate402 v{}", env!("CARGO_PKG_VERSION"));

    let cache = Arc::new(ProofCache::new(config.proof_ttl, Arc::new(SystemClock)));
    let gate = Arc::new(PaymentGate::from_config(&config, cache));

    tracing::info!(
        verify_onchain = gate.verifies_onchain(),
        price_eth = %config.price_eth,
        chain_id = config.chain_id,
        "Payment gate initialized"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = router(AppState {
        gate,
        config: Arc::new(config),
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl+c");
        return;
    }
    tracing::info!("Shutting down gracefully...");
}
