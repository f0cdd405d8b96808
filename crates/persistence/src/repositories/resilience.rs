//! Circuit breaker and connection pool snapshot repository.
//!
//! The breaker state machine and pool accounting are written by the
//! resilience subsystem; everything here is read-only derivation.

use sqlx::PgPool;

use crate::entities::{CircuitBreakerStatusEntity, ConnectionPoolStatsEntity};
use crate::metrics::QueryTimer;

/// Repository for resilience snapshots.
#[derive(Clone)]
pub struct ResilienceRepository {
    pool: PgPool,
}

impl ResilienceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Snapshot of every circuit breaker, most recently changed first.
    pub async fn get_circuit_breaker_status(
        &self,
    ) -> Result<Vec<CircuitBreakerStatusEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_circuit_breaker_status");
        let result = sqlx::query_as::<_, CircuitBreakerStatusEntity>(
            r#"
            SELECT
                cb.server_id,
                s.name AS server_name,
                cb.service_name,
                cb.state,
                cb.failure_count,
                cb.success_count,
                cb.last_state_change,
                EXTRACT(EPOCH FROM (utc_now() - cb.last_state_change))::float8
                    AS seconds_in_current_state
            FROM circuit_breakers cb
            JOIN servers s ON cb.server_id = s.id
            ORDER BY cb.last_state_change DESC, cb.service_name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Snapshot of every upstream connection pool.
    ///
    /// Utilization is derived in process so the zero-capacity guard lives
    /// in one place.
    pub async fn get_connection_pool_stats(
        &self,
    ) -> Result<Vec<ConnectionPoolStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_connection_pool_stats");
        let result = sqlx::query_as::<_, ConnectionPoolStatsEntity>(
            r#"
            SELECT
                cp.server_id,
                s.name AS server_name,
                cp.pool_name,
                cp.active_connections,
                cp.idle_connections,
                cp.max_size,
                COALESCE(cp.avg_connection_time_ms, 0)::float8 AS avg_connection_time_ms,
                cp.is_healthy
            FROM connection_pools cp
            JOIN servers s ON cp.server_id = s.id
            ORDER BY s.name, cp.pool_name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
