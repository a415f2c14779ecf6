use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::queue_repository_errors::QueueRepositoryError;
use crate::services::errors::problem_service_errors::ProblemServiceError;

#[derive(Debug)]
pub enum MatchmakingServiceError {
    ValidationError(String),
    RepositoryError(String),
    ProblemCatalogError(String),
}

impl std::fmt::Display for MatchmakingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchmakingServiceError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            MatchmakingServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
            MatchmakingServiceError::ProblemCatalogError(msg) => {
                write!(f, "Problem catalog error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchmakingServiceError {}

impl From<QueueRepositoryError> for MatchmakingServiceError {
    fn from(error: QueueRepositoryError) -> Self {
        MatchmakingServiceError::RepositoryError(error.to_string())
    }
}

impl From<MatchRepositoryError> for MatchmakingServiceError {
    fn from(error: MatchRepositoryError) -> Self {
        MatchmakingServiceError::RepositoryError(error.to_string())
    }
}

impl From<ProblemServiceError> for MatchmakingServiceError {
    fn from(error: ProblemServiceError) -> Self {
        MatchmakingServiceError::ProblemCatalogError(error.to_string())
    }
}
