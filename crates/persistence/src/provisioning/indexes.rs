//! Index set backing the reporting queries.
//!
//! This is a closed, intentional set: no index exists without a consumer
//! query in the repository layer, and tenant-scoped queries lead with
//! `tenant_id` since tenant isolation is the dominant access pattern.
//! Partial predicates keep index size proportional to the hot subset of
//! the append-heavy tables.

use sqlx::PgPool;
use tracing::info;

const INDEX_STATEMENTS: &[&str] = &[
    // servers: health summary, performance ranking, tenant usage
    "CREATE INDEX IF NOT EXISTS idx_servers_tenant_status ON servers (tenant_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_servers_tenant_health ON servers (tenant_id, health_status)",
    "CREATE INDEX IF NOT EXISTS idx_servers_health_active ON servers (health_status) WHERE status = 'active'",
    "CREATE INDEX IF NOT EXISTS idx_servers_status ON servers (status)",
    "CREATE INDEX IF NOT EXISTS idx_servers_last_health_check ON servers (last_health_check)",
    "CREATE INDEX IF NOT EXISTS idx_servers_transport_active ON servers (transport_type) WHERE status = 'active'",
    "CREATE INDEX IF NOT EXISTS idx_servers_name ON servers (name)",
    // tools: tool usage analytics
    "CREATE INDEX IF NOT EXISTS idx_tools_server_id ON tools (server_id)",
    "CREATE INDEX IF NOT EXISTS idx_tools_server_calls ON tools (server_id, total_calls) WHERE total_calls > 0",
    "CREATE INDEX IF NOT EXISTS idx_tools_total_calls ON tools (total_calls) WHERE total_calls > 0",
    "CREATE INDEX IF NOT EXISTS idx_tools_last_used ON tools (last_used_at) WHERE last_used_at IS NOT NULL",
    // resources: tenant usage counts
    "CREATE INDEX IF NOT EXISTS idx_resources_server_id ON resources (server_id)",
    "CREATE INDEX IF NOT EXISTS idx_resources_server_calls ON resources (server_id, call_count) WHERE call_count > 0",
    // sessions: active-session counts, retention cleanup
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions (expires_at)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_active ON sessions (user_id, expires_at) WHERE is_revoked = false",
    // api_tokens: retention cleanup
    "CREATE INDEX IF NOT EXISTS idx_api_tokens_user_id ON api_tokens (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_api_tokens_expires_at ON api_tokens (expires_at)",
    "CREATE INDEX IF NOT EXISTS idx_api_tokens_active ON api_tokens (expires_at) WHERE is_revoked = false",
    // api_usage: request summary, trending, tenant usage, retention cleanup
    "CREATE INDEX IF NOT EXISTS idx_api_usage_requested_at ON api_usage (requested_at)",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_tenant_requested ON api_usage (tenant_id, requested_at)",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_user_requested ON api_usage (user_id, requested_at) WHERE user_id IS NOT NULL",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_token ON api_usage (token_id) WHERE token_id IS NOT NULL",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_status_requested ON api_usage (status_code, requested_at)",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_path_requested ON api_usage (path, requested_at)",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_response_time ON api_usage (requested_at, response_time) WHERE response_time IS NOT NULL",
    // users: tenant usage counts, session join
    "CREATE INDEX IF NOT EXISTS idx_users_tenant_id ON users (tenant_id)",
    "CREATE INDEX IF NOT EXISTS idx_users_tenant_active ON users (tenant_id) WHERE is_active = true",
    "CREATE INDEX IF NOT EXISTS idx_users_email_lower ON users (lower(email))",
    // tenants
    "CREATE INDEX IF NOT EXISTS idx_tenants_status ON tenants (status)",
    // circuit_breakers: breaker status snapshot
    "CREATE INDEX IF NOT EXISTS idx_circuit_breakers_server_service ON circuit_breakers (server_id, service_name)",
    "CREATE INDEX IF NOT EXISTS idx_circuit_breakers_state_open ON circuit_breakers (state) WHERE state <> 'closed'",
    "CREATE INDEX IF NOT EXISTS idx_circuit_breakers_last_change ON circuit_breakers (last_state_change)",
    // connection_pools: pool stats snapshot
    "CREATE INDEX IF NOT EXISTS idx_connection_pools_server_pool ON connection_pools (server_id, pool_name)",
    "CREATE INDEX IF NOT EXISTS idx_connection_pools_unhealthy ON connection_pools (server_id) WHERE is_healthy = false",
    // audit_logs: retention cleanup, tenant-scoped audit queries
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_tenant_created ON audit_logs (tenant_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_action_created ON audit_logs (action, created_at)",
    // server_metrics: retention cleanup
    "CREATE INDEX IF NOT EXISTS idx_server_metrics_recorded_at ON server_metrics (recorded_at)",
];

/// Tables touched by the index set; analyzed after creation so the planner
/// picks up fresh statistics immediately instead of waiting for autovacuum.
const ANALYZED_TABLES: &[&str] = &[
    "servers",
    "tools",
    "resources",
    "sessions",
    "api_tokens",
    "api_usage",
    "users",
    "tenants",
    "circuit_breakers",
    "connection_pools",
    "audit_logs",
    "server_metrics",
];

/// Create the reporting index set and refresh planner statistics. Idempotent.
pub async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in INDEX_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    for table in ANALYZED_TABLES {
        sqlx::query(&format!("ANALYZE {table}")).execute(pool).await?;
    }
    info!(
        indexes = INDEX_STATEMENTS.len(),
        tables_analyzed = ANALYZED_TABLES.len(),
        "Created reporting indexes"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_set_is_closed() {
        // The index set is intentional, not exhaustive; growing it means a
        // new consumer query exists.
        assert_eq!(INDEX_STATEMENTS.len(), 38);
    }

    #[test]
    fn test_all_indexes_idempotent() {
        for stmt in INDEX_STATEMENTS {
            assert!(stmt.starts_with("CREATE INDEX IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_every_indexed_table_is_analyzed() {
        for stmt in INDEX_STATEMENTS {
            let on_clause = stmt
                .split(" ON ")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .unwrap();
            assert!(
                ANALYZED_TABLES.contains(&on_clause),
                "table {on_clause} missing from ANALYZE pass"
            );
        }
    }
}
