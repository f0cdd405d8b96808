//! Analytics and reporting routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use domain::models::{
    RequestPerformanceSummary, ServerHealthSummary, ServerPerformance, TenantUsageSummary,
    ToolUsage, TrendGranularity, UsageTrendBucket,
};
use persistence::repositories::{
    HealthRepository, PerformanceRepository, ToolRepository, UsageRepository,
};
use shared::validation::{validate_ranking_limit, validate_summary_hours, validate_trend_days};

use crate::app::AppState;
use crate::error::ApiError;

const DEFAULT_RANKING_LIMIT: i64 = 10;
const DEFAULT_SUMMARY_HOURS: i64 = 24;
const DEFAULT_TREND_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RequestSummaryQuery {
    pub hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub days: Option<i64>,
    pub granularity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToolAnalyticsQuery {
    pub server_id: Option<Uuid>,
}

/// GET /api/v1/analytics/servers/health
///
/// Aggregate health counts over non-inactive servers.
pub async fn get_server_health_summary(
    State(state): State<AppState>,
) -> Result<Json<ServerHealthSummary>, ApiError> {
    let repo = HealthRepository::new(state.pool.clone());
    let entity = repo.get_server_health_summary().await?;

    let summary = ServerHealthSummary {
        total_servers: entity.total_servers,
        healthy_servers: entity.healthy_servers,
        unhealthy_servers: entity.unhealthy_servers,
        degraded_servers: entity.degraded_servers,
        avg_response_time_ms: entity.avg_response_time_ms,
    };

    info!(
        total = summary.total_servers,
        healthy = summary.healthy_servers,
        "Fetched server health summary"
    );

    Ok(Json(summary))
}

/// GET /api/v1/analytics/servers/ranking?limit=
///
/// Servers ranked by composite performance score.
pub async fn get_server_performance_ranking(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<ServerPerformance>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RANKING_LIMIT);
    validate_ranking_limit(limit)?;

    let repo = PerformanceRepository::new(state.pool.clone());
    let ranking = repo.get_server_performance_ranking(limit).await?;

    info!(limit, servers = ranking.len(), "Fetched performance ranking");

    Ok(Json(ranking))
}

/// GET /api/v1/analytics/requests?hours=
///
/// Windowed request performance summary with p95/p99 latency.
pub async fn get_request_performance_summary(
    State(state): State<AppState>,
    Query(query): Query<RequestSummaryQuery>,
) -> Result<Json<RequestPerformanceSummary>, ApiError> {
    let hours = query.hours.unwrap_or(DEFAULT_SUMMARY_HOURS);
    validate_summary_hours(hours)?;

    let repo = PerformanceRepository::new(state.pool.clone());
    let summary = repo.get_request_performance_summary(hours).await?;

    info!(
        hours,
        total_requests = summary.total_requests,
        "Fetched request performance summary"
    );

    Ok(Json(summary))
}

/// GET /api/v1/analytics/tenants/:tenant_id/usage
///
/// Usage counts for one tenant. Tenants with no data report zeroes.
pub async fn get_tenant_usage_summary(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<TenantUsageSummary>, ApiError> {
    let repo = UsageRepository::new(state.pool.clone());
    let entity = repo.get_tenant_usage_summary(tenant_id).await?;

    let summary = TenantUsageSummary {
        total_servers: entity.total_servers,
        total_tools: entity.total_tools,
        total_resources: entity.total_resources,
        total_api_calls: entity.total_api_calls,
        avg_response_time_ms: entity.avg_response_time_ms,
        total_users: entity.total_users,
        active_sessions: entity.active_sessions,
    };

    info!(
        tenant_id = %tenant_id,
        servers = summary.total_servers,
        api_calls = summary.total_api_calls,
        "Fetched tenant usage summary"
    );

    Ok(Json(summary))
}

/// GET /api/v1/analytics/usage/trending?days=&granularity=
///
/// Bucketed API usage trend. An unknown granularity is rejected with a
/// validation error before any query runs.
pub async fn get_api_usage_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<UsageTrendBucket>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    validate_trend_days(days)?;

    let granularity: TrendGranularity = query
        .granularity
        .as_deref()
        .unwrap_or("day")
        .parse()
        .map_err(ApiError::from)?;

    let repo = UsageRepository::new(state.pool.clone());
    let entities = repo.get_api_usage_trending(days, granularity).await?;

    let buckets: Vec<UsageTrendBucket> = entities
        .into_iter()
        .map(|e| UsageTrendBucket {
            bucket_start: e.bucket_start,
            total_requests: e.total_requests,
            unique_users: e.unique_users,
            avg_response_time_ms: e.avg_response_time_ms,
            error_rate: e.error_rate,
        })
        .collect();

    info!(
        days,
        granularity = %granularity,
        buckets = buckets.len(),
        "Fetched API usage trend"
    );

    Ok(Json(buckets))
}

/// GET /api/v1/analytics/tools?server_id=
///
/// Per-tool usage analytics; zero-call tools never appear.
pub async fn get_tool_usage_analytics(
    State(state): State<AppState>,
    Query(query): Query<ToolAnalyticsQuery>,
) -> Result<Json<Vec<ToolUsage>>, ApiError> {
    let repo = ToolRepository::new(state.pool.clone());
    let entities = repo.get_tool_usage_analytics(query.server_id).await?;

    let tools: Vec<ToolUsage> = entities
        .into_iter()
        .map(|e| ToolUsage {
            tool_id: e.tool_id,
            name: e.name,
            server_name: e.server_name,
            total_calls: e.total_calls,
            success_rate: e.success_rate,
            avg_execution_time_ms: e.avg_execution_time_ms,
            last_used_at: e.last_used_at,
        })
        .collect();

    info!(
        server_id = ?query.server_id,
        tools = tools.len(),
        "Fetched tool usage analytics"
    );

    Ok(Json(tools))
}
