//! Retention cleanup background job.

use sqlx::PgPool;
use tracing::info;

use domain::models::RetentionPolicy;
use persistence::repositories::CleanupRepository;

use super::scheduler::{Job, JobFrequency};

/// Background job that deletes rows past their retention window.
pub struct CleanupExpiredDataJob {
    repo: CleanupRepository,
}

impl CleanupExpiredDataJob {
    /// Create a new cleanup job with the configured retention windows.
    pub fn new(pool: PgPool, policy: RetentionPolicy) -> Self {
        Self {
            repo: CleanupRepository::new(pool, policy),
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupExpiredDataJob {
    fn name(&self) -> &'static str {
        "cleanup_expired_data"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), String> {
        let outcomes = self
            .repo
            .cleanup_expired_data()
            .await
            .map_err(|e| format!("Retention cleanup failed: {}", e))?;

        for outcome in &outcomes {
            if outcome.rows_deleted > 0 {
                info!(
                    table = %outcome.table_name,
                    deleted = outcome.rows_deleted,
                    "Deleted rows past retention"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_frequency_is_daily() {
        let freq = JobFrequency::Daily;
        assert_eq!(freq.duration(), std::time::Duration::from_secs(86400));
    }
}
