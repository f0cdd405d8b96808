//! Common validation utilities for reporting query parameters.

use validator::ValidationError;

/// Maximum number of servers a performance ranking may return.
const MAX_RANKING_LIMIT: i64 = 100;

/// Maximum request-summary window in hours (7 days).
const MAX_SUMMARY_HOURS: i64 = 168;

/// Maximum trend window in days.
const MAX_TREND_DAYS: i64 = 90;

/// Validates that a ranking limit is within range (1 to 100).
pub fn validate_ranking_limit(limit: i64) -> Result<(), ValidationError> {
    if (1..=MAX_RANKING_LIMIT).contains(&limit) {
        Ok(())
    } else {
        let mut err = ValidationError::new("limit_range");
        err.message = Some("Limit must be between 1 and 100".into());
        Err(err)
    }
}

/// Validates that a request-summary window is within range (1 to 168 hours).
pub fn validate_summary_hours(hours: i64) -> Result<(), ValidationError> {
    if (1..=MAX_SUMMARY_HOURS).contains(&hours) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hours_range");
        err.message = Some("Hours must be between 1 and 168".into());
        Err(err)
    }
}

/// Validates that a trend window is within range (1 to 90 days).
pub fn validate_trend_days(days: i64) -> Result<(), ValidationError> {
    if (1..=MAX_TREND_DAYS).contains(&days) {
        Ok(())
    } else {
        let mut err = ValidationError::new("days_range");
        err.message = Some("Days must be between 1 and 90".into());
        Err(err)
    }
}
