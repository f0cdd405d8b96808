//! Tool usage analytics entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row shape of the tool usage analytics query.
///
/// The query filters to `total_calls > 0`, which also guards the
/// success-rate division.
#[derive(Debug, Clone, FromRow)]
pub struct ToolUsageEntity {
    pub tool_id: Uuid,
    pub name: String,
    pub server_name: String,
    pub total_calls: i64,
    pub success_rate: f64,
    pub avg_execution_time_ms: f64,
    pub last_used_at: Option<DateTime<Utc>>,
}
