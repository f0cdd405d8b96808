//! Retention policy and cleanup reporting models.

use serde::{Deserialize, Serialize};

/// Per-table retention windows, in days.
///
/// Defaults match the gateway's standing policy; deployments may widen or
/// narrow them through configuration. A window of zero days is rejected at
/// config validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetentionPolicy {
    /// Sessions are deleted this many days after they expire.
    pub expired_sessions_days: u32,
    /// API tokens are deleted this many days after they expire.
    pub expired_tokens_days: u32,
    /// Audit log entries older than this are deleted.
    pub audit_logs_days: u32,
    /// Request log entries older than this are deleted.
    pub api_usage_days: u32,
    /// Raw health-probe samples older than this are deleted.
    pub server_metrics_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            expired_sessions_days: 7,
            expired_tokens_days: 30,
            audit_logs_days: 90,
            api_usage_days: 30,
            server_metrics_days: 7,
        }
    }
}

/// Deletion count for one table in a cleanup pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CleanupOutcome {
    pub table_name: String,
    pub rows_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retention_windows() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.expired_sessions_days, 7);
        assert_eq!(policy.expired_tokens_days, 30);
        assert_eq!(policy.audit_logs_days, 90);
        assert_eq!(policy.api_usage_days, 30);
        assert_eq!(policy.server_metrics_days, 7);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = CleanupOutcome {
            table_name: "sessions".to_string(),
            rows_deleted: 42,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"table_name\":\"sessions\""));
        assert!(json.contains("\"rows_deleted\":42"));
    }
}
