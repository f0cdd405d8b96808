//! Retention cleanup repository.
//!
//! The only write path in the analytics layer. Each DELETE is bounded by a
//! time predicate, so the pass is convergent: re-running immediately
//! deletes nothing. There is deliberately no transaction across the
//! deletes; a mid-sequence failure leaves a partial cleanup that the next
//! run completes.

use sqlx::PgPool;
use tracing::debug;

use domain::models::{CleanupOutcome, RetentionPolicy};

use crate::metrics::record_cleanup_deletions;

/// Repository for retention cleanup.
#[derive(Clone)]
pub struct CleanupRepository {
    pool: PgPool,
    policy: RetentionPolicy,
}

impl CleanupRepository {
    pub fn new(pool: PgPool, policy: RetentionPolicy) -> Self {
        Self { pool, policy }
    }

    /// Delete rows past their retention window, one table at a time.
    ///
    /// Returns one outcome per table, in execution order, including tables
    /// where nothing was deleted.
    pub async fn cleanup_expired_data(&self) -> Result<Vec<CleanupOutcome>, sqlx::Error> {
        let passes: [(&str, &str, u32); 5] = [
            (
                "sessions",
                "DELETE FROM sessions WHERE expires_at < utc_now() - make_interval(days => $1)",
                self.policy.expired_sessions_days,
            ),
            (
                "api_tokens",
                "DELETE FROM api_tokens WHERE expires_at < utc_now() - make_interval(days => $1)",
                self.policy.expired_tokens_days,
            ),
            (
                "audit_logs",
                "DELETE FROM audit_logs WHERE created_at < utc_now() - make_interval(days => $1)",
                self.policy.audit_logs_days,
            ),
            (
                "api_usage",
                "DELETE FROM api_usage WHERE requested_at < utc_now() - make_interval(days => $1)",
                self.policy.api_usage_days,
            ),
            (
                "server_metrics",
                "DELETE FROM server_metrics WHERE recorded_at < utc_now() - make_interval(days => $1)",
                self.policy.server_metrics_days,
            ),
        ];

        let mut outcomes = Vec::with_capacity(passes.len());
        for (table_name, statement, retention_days) in passes {
            let result = sqlx::query(statement)
                .bind(retention_days as i32)
                .execute(&self.pool)
                .await?;
            let rows_deleted = result.rows_affected();

            record_cleanup_deletions(table_name, rows_deleted);
            debug!(
                table = table_name,
                deleted = rows_deleted,
                retention_days, "Retention pass complete"
            );
            outcomes.push(CleanupOutcome {
                table_name: table_name.to_string(),
                rows_deleted,
            });
        }

        Ok(outcomes)
    }
}
