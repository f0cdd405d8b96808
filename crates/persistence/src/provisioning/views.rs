//! Materialized dashboard views.
//!
//! Pre-joined projections for dashboard consumers that tolerate staleness
//! up to the refresh interval. Each view carries a unique index so it can
//! be refreshed with `CONCURRENTLY`, keeping reads unblocked during a
//! refresh.

use sqlx::PgPool;
use tracing::info;

/// Views refreshed by the background refresh job, in creation order.
pub const MATERIALIZED_VIEWS: &[&str] = &[
    "server_health_overview",
    "tenant_usage_overview",
    "tool_usage_overview",
];

const VIEW_STATEMENTS: &[&str] = &[
    r#"
    CREATE MATERIALIZED VIEW IF NOT EXISTS server_health_overview AS
    SELECT
        s.id AS server_id,
        s.tenant_id,
        s.name,
        s.status,
        s.health_status,
        COALESCE(s.avg_response_time, 0)::float8 AS avg_response_time_ms,
        COALESCE(s.uptime, 0)::float8 AS uptime,
        COALESCE(s.request_count, 0)::bigint AS total_requests,
        s.last_health_check,
        (SELECT COUNT(*) FROM tools t WHERE t.server_id = s.id)::bigint AS tool_count
    FROM servers s
    WHERE s.status <> 'inactive'
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_server_health_overview_server
        ON server_health_overview (server_id)
    "#,
    r#"
    CREATE MATERIALIZED VIEW IF NOT EXISTS tenant_usage_overview AS
    SELECT
        t.id AS tenant_id,
        t.name,
        (SELECT COUNT(*) FROM servers s WHERE s.tenant_id = t.id)::bigint AS server_count,
        (SELECT COUNT(*) FROM servers s
         WHERE s.tenant_id = t.id AND s.status = 'active')::bigint AS active_server_count,
        (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id)::bigint AS user_count,
        (SELECT COUNT(*) FROM api_usage au
         WHERE au.tenant_id = t.id
           AND au.requested_at >= utc_now() - interval '24 hours')::bigint AS api_calls_24h
    FROM tenants t
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_tenant_usage_overview_tenant
        ON tenant_usage_overview (tenant_id)
    "#,
    r#"
    CREATE MATERIALIZED VIEW IF NOT EXISTS tool_usage_overview AS
    SELECT
        t.id AS tool_id,
        t.server_id,
        t.name,
        s.name AS server_name,
        COALESCE(t.total_calls, 0)::bigint AS total_calls,
        COALESCE(t.success_count, 0)::bigint AS success_count,
        COALESCE(t.error_count, 0)::bigint AS error_count,
        COALESCE(t.avg_execution_time, 0)::float8 AS avg_execution_time_ms,
        t.last_used_at
    FROM tools t
    JOIN servers s ON t.server_id = s.id
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_tool_usage_overview_tool
        ON tool_usage_overview (tool_id)
    "#,
];

/// Create the dashboard views and their refresh indexes. Idempotent.
pub async fn create_views(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in VIEW_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!(views = MATERIALIZED_VIEWS.len(), "Created materialized views");
    Ok(())
}

/// Refresh every dashboard view, sequentially, without blocking readers.
pub async fn refresh_views(pool: &PgPool) -> Result<(), sqlx::Error> {
    for view in MATERIALIZED_VIEWS {
        sqlx::query(&format!("REFRESH MATERIALIZED VIEW CONCURRENTLY {view}"))
            .execute(pool)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_view_has_a_unique_index() {
        // CONCURRENTLY refresh requires one.
        for view in MATERIALIZED_VIEWS {
            assert!(VIEW_STATEMENTS
                .iter()
                .any(|s| s.contains("CREATE UNIQUE INDEX") && s.contains(view)));
        }
    }

    #[test]
    fn test_all_view_statements_idempotent() {
        for stmt in VIEW_STATEMENTS {
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }
}
