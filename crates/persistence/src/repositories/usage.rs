//! Tenant usage and API usage trend repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::TrendGranularity;

use crate::entities::{TenantUsageSummaryEntity, UsageTrendBucketEntity};
use crate::metrics::QueryTimer;

/// Repository for tenant-scoped usage reporting.
#[derive(Clone)]
pub struct UsageRepository {
    pool: PgPool,
}

impl UsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Usage counts for one tenant.
    ///
    /// Correlated subqueries scoped to the tenant; a tenant with no data
    /// gets a zero-valued row, never nulls.
    pub async fn get_tenant_usage_summary(
        &self,
        tenant_id: Uuid,
    ) -> Result<TenantUsageSummaryEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_tenant_usage_summary");
        let result = sqlx::query_as::<_, TenantUsageSummaryEntity>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM servers WHERE tenant_id = $1)::bigint AS total_servers,
                (SELECT COUNT(*) FROM tools t
                 JOIN servers s ON t.server_id = s.id
                 WHERE s.tenant_id = $1)::bigint AS total_tools,
                (SELECT COUNT(*) FROM resources r
                 JOIN servers s ON r.server_id = s.id
                 WHERE s.tenant_id = $1)::bigint AS total_resources,
                (SELECT COUNT(*) FROM api_usage WHERE tenant_id = $1)::bigint AS total_api_calls,
                COALESCE(
                    (SELECT AVG(response_time) FROM api_usage
                     WHERE tenant_id = $1 AND response_time IS NOT NULL),
                    0
                )::float8 AS avg_response_time_ms,
                (SELECT COUNT(*) FROM users WHERE tenant_id = $1)::bigint AS total_users,
                (SELECT COUNT(*) FROM sessions se
                 JOIN users u ON se.user_id = u.id
                 WHERE u.tenant_id = $1
                   AND NOT se.is_revoked
                   AND se.expires_at > utc_now())::bigint AS active_sessions
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bucketed API usage trend over the trailing window.
    ///
    /// The granularity has already been parsed against the allow-list; only
    /// its `date_trunc` unit reaches the query.
    pub async fn get_api_usage_trending(
        &self,
        days: i64,
        granularity: TrendGranularity,
    ) -> Result<Vec<UsageTrendBucketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_api_usage_trending");
        let result = sqlx::query_as::<_, UsageTrendBucketEntity>(
            r#"
            SELECT
                date_trunc($2, requested_at) AS bucket_start,
                COUNT(*)::bigint AS total_requests,
                COUNT(DISTINCT user_id)::bigint AS unique_users,
                COALESCE(AVG(response_time), 0)::float8 AS avg_response_time_ms,
                (COUNT(*) FILTER (WHERE status_code >= 400))::float8 * 100.0
                    / COUNT(*)::float8 AS error_rate
            FROM api_usage
            WHERE requested_at >= utc_now() - make_interval(days => $1)
            GROUP BY bucket_start
            ORDER BY bucket_start
            "#,
        )
        .bind(days as i32)
        .bind(granularity.date_trunc_unit())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
