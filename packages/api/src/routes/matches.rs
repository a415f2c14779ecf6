use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use lambda_http::tracing::{debug, error, info};
use serde::{Deserialize, Serialize};

use shared::models::matches::Match;
use shared::services::match_events::MatchSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches/{match_id}", get(get_match))
        .route("/matches/{match_id}/submit", post(submit_solution))
        .route("/users/{user_id}/matches", get(user_matches))
}

async fn user_matches(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MatchSnapshot>, ApiError> {
    debug!("Match snapshot request for user: {}", user_id);

    let snapshot = state
        .match_event_service
        .snapshot(&user_id)
        .await
        .map_err(|e| {
            error!("Failed to load matches for {}: {}", user_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(snapshot))
}

async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Match>, ApiError> {
    debug!("Get match request for: {}", match_id);

    let game = state.match_service.get_match(&match_id).await.map_err(|e| {
        error!("Failed to load match {}: {}", match_id, e);
        ApiError::from(e)
    })?;

    game.map(Json).ok_or(ApiError::MatchNotFound)
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    pub code: String,
    pub language: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
}

async fn submit_solution(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    debug!(
        "Submission for match {} from user {}",
        match_id, request.user_id
    );

    let game = state
        .match_service
        .get_match(&match_id)
        .await
        .map_err(|e| {
            error!("Failed to load match {}: {}", match_id, e);
            ApiError::from(e)
        })?
        .ok_or(ApiError::MatchNotFound)?;

    let problem = state
        .problem_service
        .get_problem(&game.problem_id)
        .await
        .map_err(|e| {
            error!("Failed to load problem {}: {}", game.problem_id, e);
            ApiError::from(e)
        })?;

    let summary = state
        .judge_service
        .run_test_cases(&request.code, &request.language, &problem.test_cases)
        .await
        .map_err(|e| {
            error!("Judge run failed for match {}: {}", match_id, e);
            ApiError::from(e)
        })?;

    let accepted = state
        .match_service
        .submit_solution(
            &match_id,
            &request.user_id,
            &request.code,
            &request.language,
            summary.test_cases_passed,
            summary.total_test_cases,
        )
        .await
        .map_err(|e| {
            error!("Failed to record submission for match {}: {}", match_id, e);
            ApiError::from(e)
        })?;

    if accepted {
        info!(
            "Recorded submission for match {}: {}/{} test cases passed",
            match_id, summary.test_cases_passed, summary.total_test_cases
        );
    }

    Ok(Json(SubmitResponse {
        accepted,
        test_cases_passed: summary.test_cases_passed,
        total_test_cases: summary.total_test_cases,
    }))
}
