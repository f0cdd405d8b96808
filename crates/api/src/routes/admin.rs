//! Administrative routes: retention cleanup and schema diagnostics.

use axum::{extract::State, Json};
use tracing::info;

use domain::models::CleanupOutcome;
use persistence::repositories::CleanupRepository;
use shared::json_fields::{validate_schema_health, SchemaHealthReport};

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/v1/admin/cleanup
///
/// Run the retention cleanup pass and report per-table deletion counts.
/// Safe to call repeatedly: every delete is bounded by a retention window,
/// so an immediate re-run deletes nothing.
pub async fn run_cleanup(
    State(state): State<AppState>,
) -> Result<Json<Vec<CleanupOutcome>>, ApiError> {
    let repo = CleanupRepository::new(state.pool.clone(), state.config.retention.policy());
    let outcomes = repo.cleanup_expired_data().await?;

    let total_deleted: u64 = outcomes.iter().map(|o| o.rows_deleted).sum();
    info!(
        tables = outcomes.len(),
        total_deleted, "Retention cleanup complete"
    );

    Ok(Json(outcomes))
}

/// GET /api/v1/admin/schema-health
///
/// Diagnostic over the JSON field schema registry: which fields accept an
/// empty object, which require properties, and which have no compiled
/// schema at all.
pub async fn schema_health() -> Json<SchemaHealthReport> {
    let report = validate_schema_health();

    if !report.is_healthy() {
        tracing::warn!(
            missing = ?report.missing_schema,
            "JSON field registry has fields without a compiled schema"
        );
    }

    Json(report)
}
