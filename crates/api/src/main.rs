use std::time::Duration;

use anyhow::Result;
use tracing::info;

use registry_gateway_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!(
        "Starting MCP Registry Gateway analytics backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;

    // Provision analytics database objects (runs after external migrations
    // have created the base tables; idempotent on every start)
    info!("Provisioning analytics database objects...");
    persistence::provisioning::provision(&pool).await?;

    // Start background jobs
    let mut scheduler = jobs::JobScheduler::new();
    scheduler.register(jobs::CleanupExpiredDataJob::new(
        pool.clone(),
        config.retention.policy(),
    ));
    scheduler.register(jobs::RefreshViewsJob::new(
        pool.clone(),
        config.jobs.refresh_views_interval_mins,
    ));
    scheduler.register(jobs::PoolMetricsJob::new(
        pool.clone(),
        config.jobs.pool_metrics_interval_secs,
    ));
    scheduler.start();

    // Build application
    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool);

    // Start server
    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain background jobs before exiting
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
