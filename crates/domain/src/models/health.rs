//! Server and system health models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate health counts over non-inactive servers.
///
/// Servers with an unknown health status are reported as the degraded
/// bucket, so healthy + unhealthy + degraded always equals total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerHealthSummary {
    pub total_servers: i64,
    pub healthy_servers: i64,
    pub unhealthy_servers: i64,
    pub degraded_servers: i64,
    pub avg_response_time_ms: f64,
}

/// Status of a single system component probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health of one system component, with probe-specific details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComponentHealth {
    pub component: String,
    pub status: ComponentStatus,
    pub details: serde_json::Value,
}

/// Combined multi-component health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SystemHealthReport {
    pub status: ComponentStatus,
    pub components: Vec<ComponentHealth>,
    pub generated_at: DateTime<Utc>,
}

impl SystemHealthReport {
    /// Overall status is the worst component status.
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let status = components
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Healthy);
        Self {
            status,
            components,
            generated_at: Utc::now(),
        }
    }
}

/// Average API latency above which the api_performance component is degraded.
pub const API_LATENCY_DEGRADED_MS: f64 = 1000.0;

/// Average API latency above which the api_performance component is unhealthy.
pub const API_LATENCY_UNHEALTHY_MS: f64 = 2000.0;

/// Classify average API latency into a component status.
///
/// The unhealthy tier is checked before the degraded tier so both are
/// reachable.
pub fn classify_api_latency(avg_response_time_ms: f64) -> ComponentStatus {
    if avg_response_time_ms > API_LATENCY_UNHEALTHY_MS {
        ComponentStatus::Unhealthy
    } else if avg_response_time_ms > API_LATENCY_DEGRADED_MS {
        ComponentStatus::Degraded
    } else {
        ComponentStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_api_latency_tiers() {
        assert_eq!(classify_api_latency(0.0), ComponentStatus::Healthy);
        assert_eq!(classify_api_latency(1000.0), ComponentStatus::Healthy);
        assert_eq!(classify_api_latency(1000.1), ComponentStatus::Degraded);
        assert_eq!(classify_api_latency(2000.0), ComponentStatus::Degraded);
        // The unhealthy tier must be reachable.
        assert_eq!(classify_api_latency(2000.1), ComponentStatus::Unhealthy);
        assert_eq!(classify_api_latency(5000.0), ComponentStatus::Unhealthy);
    }

    #[test]
    fn test_overall_status_is_worst_component() {
        let report = SystemHealthReport::from_components(vec![
            ComponentHealth {
                component: "database".to_string(),
                status: ComponentStatus::Healthy,
                details: json!({}),
            },
            ComponentHealth {
                component: "api_performance".to_string(),
                status: ComponentStatus::Degraded,
                details: json!({}),
            },
        ]);
        assert_eq!(report.status, ComponentStatus::Degraded);
    }

    #[test]
    fn test_overall_status_empty_components() {
        let report = SystemHealthReport::from_components(Vec::new());
        assert_eq!(report.status, ComponentStatus::Healthy);
        assert!(report.components.is_empty());
    }

    #[test]
    fn test_component_status_ordering() {
        assert!(ComponentStatus::Healthy < ComponentStatus::Degraded);
        assert!(ComponentStatus::Degraded < ComponentStatus::Unhealthy);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = ServerHealthSummary {
            total_servers: 10,
            healthy_servers: 7,
            unhealthy_servers: 2,
            degraded_servers: 1,
            avg_response_time_ms: 142.5,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"total_servers\":10"));
        assert!(json.contains("\"degraded_servers\":1"));
    }
}
