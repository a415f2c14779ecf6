use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use lambda_http::tracing::{debug, error};
use serde::Deserialize;

use shared::models::user::UserProfile;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LEADERBOARD_SIZE: usize = 25;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/users/{user_id}/profile", get(get_profile))
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    debug!("Leaderboard request, limit: {}", limit);

    let profiles = state.user_service.leaderboard(limit).await.map_err(|e| {
        error!("Failed to load leaderboard: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(profiles))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    debug!("Profile request for user: {}", user_id);

    let profile = state.user_service.get_profile(&user_id).await.map_err(|e| {
        error!("Failed to load profile for {}: {}", user_id, e);
        ApiError::from(e)
    })?;

    Ok(Json(profile))
}
