//! Server health and system health repository.

use serde_json::json;
use sqlx::{PgPool, Row};

use domain::models::{
    classify_api_latency, ComponentHealth, ComponentStatus, SystemHealthReport,
};

use crate::entities::ServerHealthSummaryEntity;
use crate::metrics::QueryTimer;

/// Share of healthy active servers below which the fleet is unhealthy.
const FLEET_UNHEALTHY_BELOW: f64 = 50.0;

/// Share of healthy active servers below which the fleet is degraded.
const FLEET_DEGRADED_BELOW: f64 = 90.0;

/// Repository for server and system health reporting.
#[derive(Clone)]
pub struct HealthRepository {
    pool: PgPool,
}

impl HealthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate health counts over non-inactive servers.
    ///
    /// Servers whose health has not been probed yet (`health_status =
    /// 'unknown'`) are reported as degraded, so the three buckets partition
    /// the total.
    pub async fn get_server_health_summary(
        &self,
    ) -> Result<ServerHealthSummaryEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_server_health_summary");
        let result = sqlx::query_as::<_, ServerHealthSummaryEntity>(
            r#"
            SELECT
                COUNT(*)::bigint AS total_servers,
                COUNT(*) FILTER (WHERE health_status = 'healthy')::bigint AS healthy_servers,
                COUNT(*) FILTER (WHERE health_status = 'unhealthy')::bigint AS unhealthy_servers,
                COUNT(*) FILTER (WHERE health_status = 'unknown')::bigint AS degraded_servers,
                COALESCE(AVG(avg_response_time), 0)::float8 AS avg_response_time_ms
            FROM servers
            WHERE status <> 'inactive'
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Multi-component system health check.
    ///
    /// Four independent probes, each computing its own thresholds; a probe
    /// that fails to query reports itself unhealthy rather than failing the
    /// whole report.
    pub async fn check_system_health(&self) -> SystemHealthReport {
        let (database, servers, api, sessions) = tokio::join!(
            self.probe_database(),
            self.probe_mcp_servers(),
            self.probe_api_performance(),
            self.probe_sessions(),
        );
        SystemHealthReport::from_components(vec![database, servers, api, sessions])
    }

    /// Database connectivity and round-trip latency.
    async fn probe_database(&self) -> ComponentHealth {
        let start = std::time::Instant::now();
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => ComponentHealth {
                component: "database".to_string(),
                status: ComponentStatus::Healthy,
                details: json!({ "connected": true, "latency_ms": latency_ms }),
            },
            Err(e) => ComponentHealth {
                component: "database".to_string(),
                status: ComponentStatus::Unhealthy,
                details: json!({ "connected": false, "error": e.to_string() }),
            },
        }
    }

    /// Healthy fraction of the active server fleet.
    async fn probe_mcp_servers(&self) -> ComponentHealth {
        let result = sqlx::query(
            r#"
            SELECT
                COUNT(*)::bigint AS total,
                COUNT(*) FILTER (WHERE health_status = 'healthy')::bigint AS healthy
            FROM servers
            WHERE status = 'active'
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let total: i64 = row.get("total");
                let healthy: i64 = row.get("healthy");
                let healthy_pct = if total == 0 {
                    100.0
                } else {
                    healthy as f64 * 100.0 / total as f64
                };
                let status = if healthy_pct < FLEET_UNHEALTHY_BELOW {
                    ComponentStatus::Unhealthy
                } else if healthy_pct < FLEET_DEGRADED_BELOW {
                    ComponentStatus::Degraded
                } else {
                    ComponentStatus::Healthy
                };
                ComponentHealth {
                    component: "mcp_servers".to_string(),
                    status,
                    details: json!({
                        "active_servers": total,
                        "healthy_servers": healthy,
                        "healthy_percentage": healthy_pct,
                    }),
                }
            }
            Err(e) => probe_failed("mcp_servers", e),
        }
    }

    /// Average inbound request latency over the last hour.
    async fn probe_api_performance(&self) -> ComponentHealth {
        let result = sqlx::query(
            r#"
            SELECT
                COUNT(*)::bigint AS samples,
                COALESCE(AVG(response_time), 0)::float8 AS avg_response_time_ms
            FROM api_usage
            WHERE requested_at >= utc_now() - interval '1 hour'
              AND response_time IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let samples: i64 = row.get("samples");
                let avg_ms: f64 = row.get("avg_response_time_ms");
                ComponentHealth {
                    component: "api_performance".to_string(),
                    status: classify_api_latency(avg_ms),
                    details: json!({
                        "samples_last_hour": samples,
                        "avg_response_time_ms": avg_ms,
                    }),
                }
            }
            Err(e) => probe_failed("api_performance", e),
        }
    }

    /// Session activity. Informational: healthy whenever the query runs.
    async fn probe_sessions(&self) -> ComponentHealth {
        let result = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (
                    WHERE NOT is_revoked AND expires_at > utc_now()
                )::bigint AS active_sessions,
                COUNT(*) FILTER (
                    WHERE last_activity_at >= utc_now() - interval '15 minutes'
                )::bigint AS recently_active
            FROM sessions
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let active: i64 = row.get("active_sessions");
                let recent: i64 = row.get("recently_active");
                ComponentHealth {
                    component: "sessions".to_string(),
                    status: ComponentStatus::Healthy,
                    details: json!({
                        "active_sessions": active,
                        "active_last_15m": recent,
                    }),
                }
            }
            Err(e) => probe_failed("sessions", e),
        }
    }
}

fn probe_failed(component: &str, error: sqlx::Error) -> ComponentHealth {
    ComponentHealth {
        component: component.to_string(),
        status: ComponentStatus::Unhealthy,
        details: json!({ "error": error.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_thresholds_ordering() {
        assert!(FLEET_UNHEALTHY_BELOW < FLEET_DEGRADED_BELOW);
    }

    #[test]
    fn test_probe_failed_is_unhealthy() {
        let health = probe_failed("mcp_servers", sqlx::Error::PoolClosed);
        assert_eq!(health.component, "mcp_servers");
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert!(health.details.get("error").is_some());
    }
}
