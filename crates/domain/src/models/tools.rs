//! Tool usage analytics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Usage analytics for one tool.
///
/// Only tools that have been called at least once appear in analytics
/// output, so `success_rate` is always well defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolUsage {
    pub tool_id: Uuid,
    pub name: String,
    pub server_name: String,
    pub total_calls: i64,
    /// Successful calls as a percentage of total calls, in [0, 100].
    pub success_rate: f64,
    pub avg_execution_time_ms: f64,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_shape() {
        let usage = ToolUsage {
            tool_id: Uuid::nil(),
            name: "search".to_string(),
            server_name: "docs-server".to_string(),
            total_calls: 10,
            success_rate: 80.0,
            avg_execution_time_ms: 12.5,
            last_used_at: None,
        };
        let json = serde_json::to_string(&usage).unwrap();
        assert!(json.contains("\"success_rate\":80.0"));
        assert!(json.contains("\"server_name\":\"docs-server\""));
        assert!(json.contains("\"last_used_at\":null"));
    }
}
