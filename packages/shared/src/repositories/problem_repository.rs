use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;

use crate::models::problem::Problem;
use crate::repositories::errors::problem_repository_errors::ProblemRepositoryError;

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn list_problems(&self) -> Result<Vec<Problem>, ProblemRepositoryError>;
    async fn get_problem(&self, problem_id: &str) -> Result<Problem, ProblemRepositoryError>;
}

pub struct DynamoDbProblemRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbProblemRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("PROBLEMS_TABLE")
            .expect("PROBLEMS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl ProblemRepository for DynamoDbProblemRepository {
    async fn list_problems(&self) -> Result<Vec<Problem>, ProblemRepositoryError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| ProblemRepositoryError::DynamoDb(e.to_string()))?;

        let mut problems = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let problem: Problem = from_item(item)
                    .map_err(|e| ProblemRepositoryError::Serialization(e.to_string()))?;
                problems.push(problem);
            }
        }
        Ok(problems)
    }

    async fn get_problem(&self, problem_id: &str) -> Result<Problem, ProblemRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("problem_id", AttributeValue::S(problem_id.to_string()))
            .send()
            .await
            .map_err(|e| ProblemRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let problem: Problem =
                from_item(item).map_err(|e| ProblemRepositoryError::Serialization(e.to_string()))?;
            Ok(problem)
        } else {
            Err(ProblemRepositoryError::NotFound)
        }
    }
}
