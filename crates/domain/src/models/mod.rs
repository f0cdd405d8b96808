//! Reporting domain models.

pub mod cleanup;
pub mod health;
pub mod performance;
pub mod resilience;
pub mod tools;
pub mod usage;

pub use cleanup::{CleanupOutcome, RetentionPolicy};
pub use health::{
    classify_api_latency, ComponentHealth, ComponentStatus, ServerHealthSummary,
    SystemHealthReport,
};
pub use performance::{performance_score, RequestPerformanceSummary, ServerPerformance};
pub use resilience::{
    utilization_percentage, CircuitBreakerStatus, CircuitState, ConnectionPoolStats,
};
pub use tools::ToolUsage;
pub use usage::{ParseGranularityError, TenantUsageSummary, TrendGranularity, UsageTrendBucket};
