use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;

use crate::models::matches::{Match, MatchStatus};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

/// Query surface for the match event listener. One method per query the
/// listener polls: active matches in either player slot, and completed
/// matches (with a winner decided) in either player slot.
#[async_trait]
pub trait MatchWatchRepository: Send + Sync {
    async fn active_matches_as_player1(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn active_matches_as_player2(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn completed_matches_as_player1(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn completed_matches_as_player2(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError>;
}

pub struct DynamoDbMatchWatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchWatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("MATCHES_TABLE").expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }

    async fn query(
        &self,
        index_name: &str,
        key_attribute: &str,
        user_id: &str,
        filter_expression: &str,
        statuses: &[(&str, MatchStatus)],
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index_name)
            .key_condition_expression(format!("{} = :user_id", key_attribute))
            .filter_expression(filter_expression)
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()));
        // Only the placeholders the filter references may be bound
        for (placeholder, status) in statuses {
            request = request.expression_attribute_values(
                *placeholder,
                AttributeValue::S(status.as_str().to_string()),
            );
        }

        let output = request
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        let mut matches = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let game: Match = from_item(item)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
                matches.push(game);
            }
        }
        Ok(matches)
    }
}

const ACTIVE_FILTER: &str = "#status = :matched OR #status = :in_progress";
const COMPLETED_FILTER: &str = "#status = :completed AND attribute_exists(winner)";

const ACTIVE_STATUSES: &[(&str, MatchStatus)] = &[
    (":matched", MatchStatus::Matched),
    (":in_progress", MatchStatus::InProgress),
];
const COMPLETED_STATUSES: &[(&str, MatchStatus)] = &[(":completed", MatchStatus::Completed)];

#[async_trait]
impl MatchWatchRepository for DynamoDbMatchWatchRepository {
    async fn active_matches_as_player1(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        self.query(
            "GSI_MatchesByPlayer1",
            "player1",
            user_id,
            ACTIVE_FILTER,
            ACTIVE_STATUSES,
        )
        .await
    }

    async fn active_matches_as_player2(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        self.query(
            "GSI_MatchesByPlayer2",
            "player2",
            user_id,
            ACTIVE_FILTER,
            ACTIVE_STATUSES,
        )
        .await
    }

    async fn completed_matches_as_player1(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        self.query(
            "GSI_MatchesByPlayer1",
            "player1",
            user_id,
            COMPLETED_FILTER,
            COMPLETED_STATUSES,
        )
        .await
    }

    async fn completed_matches_as_player2(
        &self,
        user_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        self.query(
            "GSI_MatchesByPlayer2",
            "player2",
            user_id,
            COMPLETED_FILTER,
            COMPLETED_STATUSES,
        )
        .await
    }
}
