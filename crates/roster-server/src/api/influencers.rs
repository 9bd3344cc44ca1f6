use axum::{
    extract::{Path, State},
    Extension, Json,
};
use roster_analytics::{AnalyticsSummary, BatchUpdateResult, InfluencerLinks};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_analytics_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Upper bound on influencers per batch request.
const MAX_BATCH_UPDATES: usize = 100;

#[derive(Debug, Deserialize)]
pub(super) struct UpdateAnalyticsRequest {
    #[serde(default)]
    content_links: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateAnalyticsData {
    updated: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchUpdateRequest {
    #[serde(default)]
    updates: Vec<InfluencerLinks>,
}

pub(super) async fn update_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(influencer_id): Path<Uuid>,
    Json(body): Json<UpdateAnalyticsRequest>,
) -> Json<ApiResponse<UpdateAnalyticsData>> {
    let updated = state
        .updater
        .update_from_content_links(influencer_id, &body.content_links)
        .await;

    Json(ApiResponse {
        data: UpdateAnalyticsData { updated },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(influencer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, ApiError> {
    let summary = state
        .updater
        .analytics_summary(influencer_id)
        .await
        .map_err(|e| map_analytics_error(req_id.0.clone(), &e))?;

    let Some(data) = summary else {
        return Err(ApiError::new(req_id.0, "not_found", "influencer not found"));
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn batch_update_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BatchUpdateRequest>,
) -> Result<Json<ApiResponse<BatchUpdateResult>>, ApiError> {
    if body.updates.len() > MAX_BATCH_UPDATES {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("at most {MAX_BATCH_UPDATES} influencers per batch"),
        ));
    }

    let data = state.updater.batch_update(&body.updates).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
