use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{admin, analytics, health, resilience};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        // Analytics (v1)
        .route(
            "/api/v1/analytics/servers/health",
            get(analytics::get_server_health_summary),
        )
        .route(
            "/api/v1/analytics/servers/ranking",
            get(analytics::get_server_performance_ranking),
        )
        .route(
            "/api/v1/analytics/requests",
            get(analytics::get_request_performance_summary),
        )
        .route(
            "/api/v1/analytics/tenants/:tenant_id/usage",
            get(analytics::get_tenant_usage_summary),
        )
        .route(
            "/api/v1/analytics/usage/trending",
            get(analytics::get_api_usage_trending),
        )
        .route(
            "/api/v1/analytics/tools",
            get(analytics::get_tool_usage_analytics),
        )
        // System health (v1)
        .route("/api/v1/system/health", get(health::system_health))
        // Resilience snapshots (v1)
        .route(
            "/api/v1/resilience/circuit-breakers",
            get(resilience::get_circuit_breaker_status),
        )
        .route(
            "/api/v1/resilience/connection-pools",
            get(resilience::get_connection_pool_stats),
        )
        // Admin (v1)
        .route("/api/v1/admin/cleanup", post(admin::run_cleanup))
        .route("/api/v1/admin/schema-health", get(admin::schema_health));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .merge(api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
