use crate::repositories::errors::problem_repository_errors::ProblemRepositoryError;

#[derive(Debug)]
pub enum ProblemServiceError {
    EmptyCatalog,
    ProblemNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for ProblemServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemServiceError::EmptyCatalog => write!(f, "Problem catalog is empty"),
            ProblemServiceError::ProblemNotFound => write!(f, "Problem not found"),
            ProblemServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ProblemServiceError {}

impl From<ProblemRepositoryError> for ProblemServiceError {
    fn from(error: ProblemRepositoryError) -> Self {
        match error {
            ProblemRepositoryError::NotFound => ProblemServiceError::ProblemNotFound,
            other => ProblemServiceError::RepositoryError(other.to_string()),
        }
    }
}
