//! Tenant usage and trend entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row shape of the tenant usage summary query. Zero-valued, never null,
/// for tenants with no data.
#[derive(Debug, Clone, FromRow)]
pub struct TenantUsageSummaryEntity {
    pub total_servers: i64,
    pub total_tools: i64,
    pub total_resources: i64,
    pub total_api_calls: i64,
    pub avg_response_time_ms: f64,
    pub total_users: i64,
    pub active_sessions: i64,
}

/// One bucket of the API usage trend query.
#[derive(Debug, Clone, FromRow)]
pub struct UsageTrendBucketEntity {
    pub bucket_start: DateTime<Utc>,
    pub total_requests: i64,
    pub unique_users: i64,
    pub avg_response_time_ms: f64,
    pub error_rate: f64,
}
