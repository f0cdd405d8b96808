//! Tenant usage and API usage trend models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time bucket width for usage trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    Hour,
    Day,
    Week,
}

/// Rejection of a granularity value outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid granularity '{0}': expected one of hour, day, week")]
pub struct ParseGranularityError(pub String);

impl FromStr for TrendGranularity {
    type Err = ParseGranularityError;

    /// Parses against the allow-list. Anything else is an error, never a
    /// silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(TrendGranularity::Hour),
            "day" => Ok(TrendGranularity::Day),
            "week" => Ok(TrendGranularity::Week),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

impl TrendGranularity {
    /// The `date_trunc` field argument for this bucket width.
    pub fn date_trunc_unit(&self) -> &'static str {
        match self {
            TrendGranularity::Hour => "hour",
            TrendGranularity::Day => "day",
            TrendGranularity::Week => "week",
        }
    }
}

impl fmt::Display for TrendGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.date_trunc_unit())
    }
}

/// Per-tenant usage counts. Tenants with no data get zeroes, never nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TenantUsageSummary {
    pub total_servers: i64,
    pub total_tools: i64,
    pub total_resources: i64,
    pub total_api_calls: i64,
    pub avg_response_time_ms: f64,
    pub total_users: i64,
    pub active_sessions: i64,
}

/// One time bucket of the API usage trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UsageTrendBucket {
    pub bucket_start: DateTime<Utc>,
    pub total_requests: i64,
    pub unique_users: i64,
    pub avg_response_time_ms: f64,
    /// Share of requests with a 4xx/5xx status, as a percentage.
    pub error_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_parses_allow_list() {
        assert_eq!("hour".parse(), Ok(TrendGranularity::Hour));
        assert_eq!("day".parse(), Ok(TrendGranularity::Day));
        assert_eq!("week".parse(), Ok(TrendGranularity::Week));
    }

    #[test]
    fn test_granularity_rejects_unknown_values() {
        let err = "fortnight".parse::<TrendGranularity>().unwrap_err();
        assert_eq!(err, ParseGranularityError("fortnight".to_string()));
        assert!(err.to_string().contains("fortnight"));

        assert!("".parse::<TrendGranularity>().is_err());
        assert!("month".parse::<TrendGranularity>().is_err());
        // Case-sensitive on purpose: the allow-list is exact.
        assert!("Hour".parse::<TrendGranularity>().is_err());
    }

    #[test]
    fn test_date_trunc_unit() {
        assert_eq!(TrendGranularity::Hour.date_trunc_unit(), "hour");
        assert_eq!(TrendGranularity::Day.date_trunc_unit(), "day");
        assert_eq!(TrendGranularity::Week.date_trunc_unit(), "week");
    }

    #[test]
    fn test_tenant_summary_defaults_to_zero() {
        let summary = TenantUsageSummary::default();
        assert_eq!(summary.total_servers, 0);
        assert_eq!(summary.total_api_calls, 0);
        assert_eq!(summary.avg_response_time_ms, 0.0);
    }
}
