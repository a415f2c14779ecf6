use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    judge_service_errors::JudgeServiceError, match_service_errors::MatchServiceError,
    matchmaking_service_errors::MatchmakingServiceError,
    problem_service_errors::ProblemServiceError, user_service_errors::UserServiceError,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Matchmaking(MatchmakingServiceError),
    Match(MatchServiceError),
    Problem(ProblemServiceError),
    User(UserServiceError),
    Judge(JudgeServiceError),
    MatchNotFound,
}

impl From<MatchmakingServiceError> for ApiError {
    fn from(error: MatchmakingServiceError) -> Self {
        ApiError::Matchmaking(error)
    }
}

impl From<MatchServiceError> for ApiError {
    fn from(error: MatchServiceError) -> Self {
        ApiError::Match(error)
    }
}

impl From<ProblemServiceError> for ApiError {
    fn from(error: ProblemServiceError) -> Self {
        ApiError::Problem(error)
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        ApiError::User(error)
    }
}

impl From<JudgeServiceError> for ApiError {
    fn from(error: JudgeServiceError) -> Self {
        ApiError::Judge(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Matchmaking(MatchmakingServiceError::ValidationError(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Matchmaking(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),

            ApiError::Match(MatchServiceError::ValidationError(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Match(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),

            ApiError::Problem(ProblemServiceError::ProblemNotFound) => {
                (StatusCode::NOT_FOUND, "Problem not found".to_string())
            }
            ApiError::Problem(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),

            ApiError::User(UserServiceError::UserNotFound) => {
                (StatusCode::NOT_FOUND, "User profile not found".to_string())
            }
            ApiError::User(UserServiceError::ValidationError(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::User(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),

            ApiError::Judge(JudgeServiceError::UnsupportedLanguage(language)) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported language: {}", language),
            ),
            ApiError::Judge(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),

            ApiError::MatchNotFound => (StatusCode::NOT_FOUND, "Match not found".to_string()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
