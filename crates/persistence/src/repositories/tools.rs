//! Tool usage analytics repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ToolUsageEntity;
use crate::metrics::QueryTimer;

/// Repository for tool usage reporting.
#[derive(Clone)]
pub struct ToolRepository {
    pool: PgPool,
}

impl ToolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Usage analytics per tool, optionally restricted to one server.
    ///
    /// Tools that have never been called are noise and are excluded; the
    /// same filter keeps the success-rate division defined.
    pub async fn get_tool_usage_analytics(
        &self,
        server_id: Option<Uuid>,
    ) -> Result<Vec<ToolUsageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_tool_usage_analytics");
        let result = sqlx::query_as::<_, ToolUsageEntity>(
            r#"
            SELECT
                t.id AS tool_id,
                t.name,
                s.name AS server_name,
                t.total_calls::bigint AS total_calls,
                (t.success_count::float8 * 100.0 / t.total_calls::float8) AS success_rate,
                COALESCE(t.avg_execution_time, 0)::float8 AS avg_execution_time_ms,
                t.last_used_at
            FROM tools t
            JOIN servers s ON t.server_id = s.id
            WHERE t.total_calls > 0
              AND ($1::uuid IS NULL OR t.server_id = $1)
            ORDER BY t.total_calls DESC, t.id
            "#,
        )
        .bind(server_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
