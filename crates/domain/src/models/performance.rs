//! Server performance ranking and request performance models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight of availability in the composite score.
const UPTIME_WEIGHT: f64 = 0.5;

/// Weight of (inverted) response latency in the composite score.
const LATENCY_WEIGHT: f64 = 0.3;

/// Weight of request volume in the composite score.
const VOLUME_WEIGHT: f64 = 0.2;

/// Response times at or above this cap contribute zero to the score.
const LATENCY_CAP_MS: f64 = 1000.0;

/// Request counts at or above this cap saturate the volume component.
const VOLUME_CAP: f64 = 1000.0;

/// Composite performance score on a 0-100 scale.
///
/// `uptime` is the availability fraction in [0, 1]; latency is inverted and
/// capped at 1000 ms; request volume saturates at 1000 requests. The weights
/// are fixed design constants.
pub fn performance_score(uptime: f64, avg_response_time_ms: f64, request_count: i64) -> f64 {
    let availability = uptime.clamp(0.0, 1.0);
    let latency = 1.0 - (avg_response_time_ms.max(0.0) / LATENCY_CAP_MS).min(1.0);
    let volume = (request_count.max(0) as f64 / VOLUME_CAP).min(1.0);
    (UPTIME_WEIGHT * availability + LATENCY_WEIGHT * latency + VOLUME_WEIGHT * volume) * 100.0
}

/// One row of the server performance ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerPerformance {
    pub server_id: Uuid,
    pub name: String,
    pub health_status: String,
    pub avg_response_time_ms: f64,
    pub uptime: f64,
    pub total_requests: i64,
    pub performance_score: f64,
}

/// Windowed summary of inbound request performance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestPerformanceSummary {
    pub window_hours: i64,
    pub total_requests: i64,
    pub success_requests: i64,
    pub error_requests: i64,
    pub avg_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_server_scores_100() {
        let score = performance_score(1.0, 0.0, 1000);
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dead_server_scores_0() {
        let score = performance_score(0.0, 1000.0, 0);
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_monotonic_in_uptime() {
        // Holding latency and volume fixed, more uptime never lowers the score.
        let mut last = f64::MIN;
        for uptime in [0.0, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let score = performance_score(uptime, 250.0, 500);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_score_monotonic_in_latency() {
        // Holding uptime and volume fixed, more latency never raises the score.
        let mut last = f64::MAX;
        for latency in [0.0, 100.0, 500.0, 999.0, 1000.0, 5000.0] {
            let score = performance_score(0.9, latency, 500);
            assert!(score <= last);
            last = score;
        }
    }

    #[test]
    fn test_latency_capped_at_1000ms() {
        // Beyond the cap, latency no longer moves the score.
        let at_cap = performance_score(0.5, 1000.0, 100);
        let past_cap = performance_score(0.5, 10_000.0, 100);
        assert!((at_cap - past_cap).abs() < f64::EPSILON);
    }

    #[test]
    fn test_volume_capped_at_1000_requests() {
        let at_cap = performance_score(0.5, 200.0, 1000);
        let past_cap = performance_score(0.5, 200.0, 1_000_000);
        assert!((at_cap - past_cap).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        // Negative inputs and uptime above 1.0 clamp instead of skewing.
        assert!(performance_score(-0.5, 100.0, 100) >= 0.0);
        assert!(performance_score(1.5, 100.0, 100) <= 100.0);
        assert!(performance_score(0.5, -50.0, -10) >= 0.0);
    }

    #[test]
    fn test_weighted_composition() {
        // Uptime only: 0.5 weight.
        assert!((performance_score(1.0, 1000.0, 0) - 50.0).abs() < 1e-9);
        // Latency only: 0.3 weight.
        assert!((performance_score(0.0, 0.0, 0) - 30.0).abs() < 1e-9);
        // Volume only: 0.2 weight.
        assert!((performance_score(0.0, 1000.0, 1000) - 20.0).abs() < 1e-9);
    }
}
