#[derive(Debug)]
pub enum SettlementRepositoryError {
    Serialization(String),
    DynamoDb(String),
    Transaction(String),
}

impl std::fmt::Display for SettlementRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            SettlementRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            SettlementRepositoryError::Transaction(msg) => write!(f, "Transaction error: {}", msg),
        }
    }
}

impl std::error::Error for SettlementRepositoryError {}
