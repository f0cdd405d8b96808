//! Materialized view refresh background job.

use sqlx::PgPool;
use tracing::info;

use persistence::provisioning::{refresh_views, MATERIALIZED_VIEWS};

use super::scheduler::{Job, JobFrequency};

/// Background job to refresh the analytics materialized views.
///
/// Dashboard consumers read the views directly and tolerate staleness up to
/// this job's interval.
pub struct RefreshViewsJob {
    pool: PgPool,
    interval_mins: u64,
}

impl RefreshViewsJob {
    /// Create a new refresh views job.
    pub fn new(pool: PgPool, interval_mins: u64) -> Self {
        Self {
            pool,
            interval_mins,
        }
    }
}

#[async_trait::async_trait]
impl Job for RefreshViewsJob {
    fn name(&self) -> &'static str {
        "refresh_views"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_mins)
    }

    async fn execute(&self) -> Result<(), String> {
        let start = std::time::Instant::now();

        refresh_views(&self.pool)
            .await
            .map_err(|e| format!("Failed to refresh materialized views: {}", e))?;

        info!(
            views = MATERIALIZED_VIEWS.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Refreshed materialized views"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_frequency_uses_configured_interval() {
        let freq = JobFrequency::Minutes(15);
        assert_eq!(freq.duration(), std::time::Duration::from_secs(900));
    }
}
