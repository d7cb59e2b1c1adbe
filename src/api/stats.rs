//! Stats endpoints: daily series, device breakdown, top referrers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::handlers::{AppState, ErrorResponse};
use crate::analytics::models::{fill_daily_window, window_start_ts};
use crate::analytics::{DailyViews, DimensionCount};
use crate::models::Profile;
use crate::storage::Storage;

#[derive(Debug, Serialize)]
pub struct DailyStatsResponse {
    pub series: Vec<DailyViews>,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub breakdown: Vec<DimensionCount>,
}

#[derive(Debug, Deserialize)]
pub struct ReferrerQuery {
    #[serde(default = "default_referrer_limit")]
    pub limit: i64,
}

fn default_referrer_limit() -> i64 {
    10
}

async fn profile_or_404(
    storage: &dyn Storage,
    slug: &str,
) -> Result<Profile, (StatusCode, Json<ErrorResponse>)> {
    match storage.get_profile(slug).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Profile not found".to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Views per calendar day over the trailing 30-day window, zero-filled.
pub async fn daily_views(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<DailyStatsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let profile = profile_or_404(state.storage.as_ref(), &slug).await?;

    let end_day = chrono::Utc::now().date_naive();
    let rows = state
        .storage
        .views_per_day(profile.id, window_start_ts(end_day))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to query daily views");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to retrieve stats".to_string(),
                }),
            )
        })?;

    Ok(Json(DailyStatsResponse {
        series: fill_daily_window(&rows, end_day),
    }))
}

pub async fn device_breakdown(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BreakdownResponse>, (StatusCode, Json<ErrorResponse>)> {
    let profile = profile_or_404(state.storage.as_ref(), &slug).await?;

    match state.storage.device_breakdown(profile.id).await {
        Ok(breakdown) => Ok(Json(BreakdownResponse { breakdown })),
        Err(e) => {
            tracing::error!(error = %e, "failed to query device breakdown");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to retrieve stats".to_string(),
                }),
            ))
        }
    }
}

pub async fn top_referrers(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ReferrerQuery>,
) -> Result<Json<BreakdownResponse>, (StatusCode, Json<ErrorResponse>)> {
    let profile = profile_or_404(state.storage.as_ref(), &slug).await?;
    let limit = query.limit.clamp(1, 100);

    match state.storage.top_referrers(profile.id, limit).await {
        Ok(breakdown) => Ok(Json(BreakdownResponse { breakdown })),
        Err(e) => {
            tracing::error!(error = %e, "failed to query top referrers");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to retrieve stats".to_string(),
                }),
            ))
        }
    }
}
