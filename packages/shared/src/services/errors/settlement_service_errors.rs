use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::errors::settlement_repository_errors::SettlementRepositoryError;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;

#[derive(Debug)]
pub enum SettlementServiceError {
    MatchNotFound,
    MatchNotCompleted,
    WinnerUndecided,
    RepositoryError(String),
}

impl std::fmt::Display for SettlementServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementServiceError::MatchNotFound => write!(f, "Match not found"),
            SettlementServiceError::MatchNotCompleted => write!(f, "Match is not completed"),
            SettlementServiceError::WinnerUndecided => {
                write!(f, "Match has no winner to settle")
            }
            SettlementServiceError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettlementServiceError {}

impl From<MatchRepositoryError> for SettlementServiceError {
    fn from(error: MatchRepositoryError) -> Self {
        SettlementServiceError::RepositoryError(error.to_string())
    }
}

impl From<UserRepositoryError> for SettlementServiceError {
    fn from(error: UserRepositoryError) -> Self {
        SettlementServiceError::RepositoryError(error.to_string())
    }
}

impl From<SettlementRepositoryError> for SettlementServiceError {
    fn from(error: SettlementRepositoryError) -> Self {
        SettlementServiceError::RepositoryError(error.to_string())
    }
}
