//! Performance reporting entities.

use sqlx::FromRow;
use uuid::Uuid;

/// Raw per-server aggregates the ranking is computed from.
#[derive(Debug, Clone, FromRow)]
pub struct ServerPerformanceRowEntity {
    pub server_id: Uuid,
    pub name: String,
    pub health_status: String,
    pub avg_response_time_ms: f64,
    pub uptime: f64,
    pub total_requests: i64,
}

/// Row shape of the windowed request performance summary.
#[derive(Debug, Clone, FromRow)]
pub struct RequestPerformanceSummaryEntity {
    pub total_requests: i64,
    pub success_requests: i64,
    pub error_requests: i64,
    pub avg_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
}
