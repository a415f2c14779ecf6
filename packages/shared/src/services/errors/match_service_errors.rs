use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[derive(Debug)]
pub enum MatchServiceError {
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            MatchServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for MatchServiceError {}

impl From<MatchRepositoryError> for MatchServiceError {
    fn from(error: MatchRepositoryError) -> Self {
        MatchServiceError::RepositoryError(error.to_string())
    }
}
