//! Circuit breaker and connection pool snapshot entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row shape of the circuit breaker status query.
#[derive(Debug, Clone, FromRow)]
pub struct CircuitBreakerStatusEntity {
    pub server_id: Uuid,
    pub server_name: String,
    pub service_name: String,
    pub state: String,
    pub failure_count: i32,
    pub success_count: i32,
    pub last_state_change: DateTime<Utc>,
    pub seconds_in_current_state: f64,
}

/// Row shape of the connection pool stats query.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionPoolStatsEntity {
    pub server_id: Uuid,
    pub server_name: String,
    pub pool_name: String,
    pub active_connections: i32,
    pub idle_connections: i32,
    pub max_size: i32,
    pub avg_connection_time_ms: f64,
    pub is_healthy: bool,
}
