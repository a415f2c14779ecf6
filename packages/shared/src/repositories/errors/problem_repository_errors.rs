#[derive(Debug)]
pub enum ProblemRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ProblemRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemRepositoryError::NotFound => write!(f, "Problem not found"),
            ProblemRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ProblemRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ProblemRepositoryError {}
