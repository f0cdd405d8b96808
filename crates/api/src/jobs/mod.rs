//! Background job scheduler and job implementations.

mod cleanup_expired;
mod pool_metrics;
mod refresh_views;
mod scheduler;

pub use cleanup_expired::CleanupExpiredDataJob;
pub use pool_metrics::PoolMetricsJob;
pub use refresh_views::RefreshViewsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
