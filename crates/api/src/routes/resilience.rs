//! Circuit breaker and connection pool snapshot routes.

use axum::{extract::State, Json};
use tracing::info;

use domain::models::{
    utilization_percentage, CircuitBreakerStatus, CircuitState, ConnectionPoolStats,
};
use persistence::repositories::ResilienceRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/resilience/circuit-breakers
///
/// Snapshot of every circuit breaker with time spent in the current state.
pub async fn get_circuit_breaker_status(
    State(state): State<AppState>,
) -> Result<Json<Vec<CircuitBreakerStatus>>, ApiError> {
    let repo = ResilienceRepository::new(state.pool.clone());
    let entities = repo.get_circuit_breaker_status().await?;

    let mut breakers = Vec::with_capacity(entities.len());
    for entity in entities {
        let breaker_state: CircuitState = entity
            .state
            .parse()
            .map_err(|e| ApiError::Internal(format!("Corrupt breaker row: {e}")))?;
        breakers.push(CircuitBreakerStatus {
            server_id: entity.server_id,
            server_name: entity.server_name,
            service_name: entity.service_name,
            state: breaker_state,
            failure_count: entity.failure_count,
            success_count: entity.success_count,
            last_state_change: entity.last_state_change,
            seconds_in_current_state: entity.seconds_in_current_state,
        });
    }

    let open = breakers
        .iter()
        .filter(|b| b.state != CircuitState::Closed)
        .count();
    info!(breakers = breakers.len(), open, "Fetched circuit breaker status");

    Ok(Json(breakers))
}

/// GET /api/v1/resilience/connection-pools
///
/// Snapshot of every upstream connection pool with derived utilization.
pub async fn get_connection_pool_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConnectionPoolStats>>, ApiError> {
    let repo = ResilienceRepository::new(state.pool.clone());
    let entities = repo.get_connection_pool_stats().await?;

    let pools: Vec<ConnectionPoolStats> = entities
        .into_iter()
        .map(|e| ConnectionPoolStats {
            utilization_percentage: utilization_percentage(e.active_connections, e.max_size),
            server_id: e.server_id,
            server_name: e.server_name,
            pool_name: e.pool_name,
            active_connections: e.active_connections,
            idle_connections: e.idle_connections,
            max_size: e.max_size,
            avg_connection_time_ms: e.avg_connection_time_ms,
            is_healthy: e.is_healthy,
        })
        .collect();

    info!(pools = pools.len(), "Fetched connection pool stats");

    Ok(Json(pools))
}
