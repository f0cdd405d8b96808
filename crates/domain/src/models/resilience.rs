//! Circuit breaker and connection pool snapshot models.
//!
//! The breaker state machine and pool accounting are owned by the
//! resilience subsystem; this layer only reads and derives.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Circuit breaker state for one (server, service) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown circuit state '{0}'")]
pub struct ParseCircuitStateError(pub String);

impl FromStr for CircuitState {
    type Err = ParseCircuitStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(CircuitState::Closed),
            "open" => Ok(CircuitState::Open),
            "half_open" => Ok(CircuitState::HalfOpen),
            other => Err(ParseCircuitStateError(other.to_string())),
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        };
        f.write_str(s)
    }
}

/// Snapshot of one circuit breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CircuitBreakerStatus {
    pub server_id: Uuid,
    pub server_name: String,
    pub service_name: String,
    pub state: CircuitState,
    pub failure_count: i32,
    pub success_count: i32,
    pub last_state_change: DateTime<Utc>,
    pub seconds_in_current_state: f64,
}

/// Snapshot of one upstream connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionPoolStats {
    pub server_id: Uuid,
    pub server_name: String,
    pub pool_name: String,
    pub active_connections: i32,
    pub idle_connections: i32,
    pub max_size: i32,
    pub utilization_percentage: f64,
    pub avg_connection_time_ms: f64,
    pub is_healthy: bool,
}

/// Pool utilization as a percentage of capacity.
///
/// An unbounded or unconfigured pool (max_size = 0) reports 0 rather than
/// dividing by zero.
pub fn utilization_percentage(active_connections: i32, max_size: i32) -> f64 {
    if max_size <= 0 {
        0.0
    } else {
        f64::from(active_connections) * 100.0 / f64::from(max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_state_round_trip() {
        for state in [CircuitState::Closed, CircuitState::Open, CircuitState::HalfOpen] {
            assert_eq!(state.to_string().parse::<CircuitState>(), Ok(state));
        }
    }

    #[test]
    fn test_circuit_state_rejects_unknown() {
        let err = "tripped".parse::<CircuitState>().unwrap_err();
        assert_eq!(err, ParseCircuitStateError("tripped".to_string()));
    }

    #[test]
    fn test_utilization_percentage() {
        assert_eq!(utilization_percentage(5, 10), 50.0);
        assert_eq!(utilization_percentage(10, 10), 100.0);
        assert_eq!(utilization_percentage(0, 10), 0.0);
    }

    #[test]
    fn test_utilization_zero_capacity_is_zero() {
        assert_eq!(utilization_percentage(5, 0), 0.0);
        assert_eq!(utilization_percentage(5, -1), 0.0);
    }
}
