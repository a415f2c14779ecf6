use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use lambda_http::tracing::{debug, error};
use serde::{Deserialize, Serialize};

use shared::services::matchmaking_service::JoinOutcome;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matchmaking/join", post(join_queue))
        .route("/matchmaking/cancel", post(cancel_queue))
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct JoinResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
}

async fn join_queue(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    debug!("Join queue request for user: {}", request.user_id);

    let outcome = state
        .matchmaking_service
        .join(&request.user_id)
        .await
        .map_err(|e| {
            error!("Failed to join queue: {}", e);
            ApiError::from(e)
        })?;

    let response = match outcome {
        JoinOutcome::Waiting => JoinResponse {
            status: "waiting".to_string(),
            match_id: None,
        },
        JoinOutcome::Matched(match_id) => JoinResponse {
            status: "matched".to_string(),
            match_id: Some(match_id),
        },
    };

    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub user_id: String,
}

async fn cancel_queue(
    State(state): State<AppState>,
    Json(request): Json<CancelRequest>,
) -> Result<StatusCode, ApiError> {
    debug!("Cancel queue request for user: {}", request.user_id);

    state
        .matchmaking_service
        .cancel(&request.user_id)
        .await
        .map_err(|e| {
            error!("Failed to cancel queue entry: {}", e);
            ApiError::from(e)
        })?;

    Ok(StatusCode::OK)
}
