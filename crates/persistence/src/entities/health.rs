//! Server health summary entity.

use sqlx::FromRow;

/// Row shape of the server health summary query.
///
/// Buckets partition the non-inactive servers: healthy + unhealthy +
/// degraded = total.
#[derive(Debug, Clone, FromRow)]
pub struct ServerHealthSummaryEntity {
    pub total_servers: i64,
    pub healthy_servers: i64,
    pub unhealthy_servers: i64,
    pub degraded_servers: i64,
    pub avg_response_time_ms: f64,
}
