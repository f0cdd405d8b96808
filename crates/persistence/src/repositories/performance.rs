//! Server and request performance repository.

use std::cmp::Ordering;

use sqlx::PgPool;

use domain::models::{performance_score, RequestPerformanceSummary, ServerPerformance};

use crate::entities::{RequestPerformanceSummaryEntity, ServerPerformanceRowEntity};
use crate::metrics::QueryTimer;

/// Repository for performance reporting.
#[derive(Clone)]
pub struct PerformanceRepository {
    pool: PgPool,
}

impl PerformanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rank non-inactive servers by composite performance score.
    ///
    /// Aggregates are fetched raw and scored in process; ordering is fully
    /// deterministic (descending score, then ascending server id).
    pub async fn get_server_performance_ranking(
        &self,
        limit: i64,
    ) -> Result<Vec<ServerPerformance>, sqlx::Error> {
        let timer = QueryTimer::new("get_server_performance_ranking");
        let result = sqlx::query_as::<_, ServerPerformanceRowEntity>(
            r#"
            SELECT
                id AS server_id,
                name,
                health_status,
                COALESCE(avg_response_time, 0)::float8 AS avg_response_time_ms,
                COALESCE(uptime, 0)::float8 AS uptime,
                COALESCE(request_count, 0)::bigint AS total_requests
            FROM servers
            WHERE status <> 'inactive'
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        let rows = result?;

        let mut ranked: Vec<ServerPerformance> = rows
            .into_iter()
            .map(|row| ServerPerformance {
                performance_score: performance_score(
                    row.uptime,
                    row.avg_response_time_ms,
                    row.total_requests,
                ),
                server_id: row.server_id,
                name: row.name,
                health_status: row.health_status,
                avg_response_time_ms: row.avg_response_time_ms,
                uptime: row.uptime,
                total_requests: row.total_requests,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.performance_score
                .partial_cmp(&a.performance_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.server_id.cmp(&b.server_id))
        });
        ranked.truncate(limit.max(0) as usize);

        Ok(ranked)
    }

    /// Windowed summary of inbound request performance.
    ///
    /// Rows with a null response time or status code carry no signal for
    /// the percentiles and are excluded from the window.
    pub async fn get_request_performance_summary(
        &self,
        hours: i64,
    ) -> Result<RequestPerformanceSummary, sqlx::Error> {
        let timer = QueryTimer::new("get_request_performance_summary");
        let result = sqlx::query_as::<_, RequestPerformanceSummaryEntity>(
            r#"
            WITH windowed AS (
                SELECT status_code, response_time
                FROM api_usage
                WHERE requested_at >= utc_now() - make_interval(hours => $1)
                  AND response_time IS NOT NULL
                  AND status_code IS NOT NULL
            )
            SELECT
                COUNT(*)::bigint AS total_requests,
                COUNT(*) FILTER (WHERE status_code < 400)::bigint AS success_requests,
                COUNT(*) FILTER (WHERE status_code >= 400)::bigint AS error_requests,
                COALESCE(AVG(response_time), 0)::float8 AS avg_response_time_ms,
                COALESCE(
                    PERCENTILE_CONT(0.95) WITHIN GROUP (ORDER BY response_time), 0
                )::float8 AS p95_response_time_ms,
                COALESCE(
                    PERCENTILE_CONT(0.99) WITHIN GROUP (ORDER BY response_time), 0
                )::float8 AS p99_response_time_ms
            FROM windowed
            "#,
        )
        .bind(hours as i32)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let entity = result?;

        Ok(RequestPerformanceSummary {
            window_hours: hours,
            total_requests: entity.total_requests,
            success_requests: entity.success_requests,
            error_requests: entity.error_requests,
            avg_response_time_ms: entity.avg_response_time_ms,
            p95_response_time_ms: entity.p95_response_time_ms,
            p99_response_time_ms: entity.p99_response_time_ms,
        })
    }
}
