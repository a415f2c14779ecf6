use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};

use crate::models::matches::{Match, MatchStatus};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, game: &Match) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError>;

    /// The user's current `matched`/`in_progress` match in either player
    /// slot, if any.
    async fn find_active_match(&self, user_id: &str)
        -> Result<Option<Match>, MatchRepositoryError>;

    /// Stores one player's submission plus the status/winner computed
    /// from it, touching only those attributes so a concurrent write to
    /// the other player's slot survives. Conditioned on the opponent's
    /// submission slot still matching what the caller read; returns
    /// `false` when that check fails and the caller must re-read.
    async fn record_submission(
        &self,
        game: &Match,
        user_id: &str,
        opponent_had_submitted: bool,
    ) -> Result<bool, MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("MATCHES_TABLE").expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }

    async fn query_player_index(
        &self,
        index_name: &str,
        key_attribute: &str,
        user_id: &str,
        filter_expression: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index_name)
            .key_condition_expression(format!("{} = :user_id", key_attribute))
            .filter_expression(filter_expression)
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .expression_attribute_values(
                ":matched",
                AttributeValue::S(MatchStatus::Matched.as_str().to_string()),
            )
            .expression_attribute_values(
                ":in_progress",
                AttributeValue::S(MatchStatus::InProgress.as_str().to_string()),
            )
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

const ACTIVE_STATUS_FILTER: &str = "#status = :matched OR #status = :in_progress";

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, game: &Match) -> Result<(), MatchRepositoryError> {
        let item = to_item(game).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(match_id)")
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("match_id", AttributeValue::S(match_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                let game: Match = from_item(item)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
                Ok(Some(game))
            }
            None => Ok(None),
        }
    }

    async fn find_active_match(
        &self,
        user_id: &str,
    ) -> Result<Option<Match>, MatchRepositoryError> {
        let as_player1 = self
            .query_player_index(
                "GSI_MatchesByPlayer1",
                "player1",
                user_id,
                ACTIVE_STATUS_FILTER,
            )
            .await?;
        if let Some(game) = as_player1.into_iter().next() {
            return Ok(Some(game));
        }

        let as_player2 = self
            .query_player_index(
                "GSI_MatchesByPlayer2",
                "player2",
                user_id,
                ACTIVE_STATUS_FILTER,
            )
            .await?;
        Ok(as_player2.into_iter().next())
    }

    async fn record_submission(
        &self,
        game: &Match,
        user_id: &str,
        opponent_had_submitted: bool,
    ) -> Result<bool, MatchRepositoryError> {
        let entry = game
            .submissions
            .get(user_id)
            .ok_or_else(|| MatchRepositoryError::Serialization("submission missing".to_string()))?;
        let submission = to_attribute_value(entry)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
        let opponent = if game.player1 == user_id {
            &game.player2
        } else {
            &game.player1
        };

        let mut update_expression =
            "SET submissions.#caller = :submission, #status = :status".to_string();
        let opponent_guard = if opponent_had_submitted {
            "attribute_exists(submissions.#opponent)"
        } else {
            "attribute_not_exists(submissions.#opponent)"
        };

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("match_id", AttributeValue::S(game.match_id.clone()))
            .condition_expression(format!("attribute_exists(match_id) AND {}", opponent_guard))
            .expression_attribute_names("#caller", user_id)
            .expression_attribute_names("#opponent", opponent)
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":submission", submission)
            .expression_attribute_values(
                ":status",
                AttributeValue::S(game.status.as_str().to_string()),
            );

        if game.status == MatchStatus::Completed {
            let ended_at = to_attribute_value(game.ended_at)
                .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            let winner = game
                .winner
                .clone()
                .ok_or_else(|| MatchRepositoryError::Serialization("winner missing".to_string()))?;
            update_expression.push_str(", winner = :winner, ended_at = :ended_at");
            request = request
                .expression_attribute_values(":winner", AttributeValue::S(winner))
                .expression_attribute_values(":ended_at", ended_at);
        }

        let result = request.update_expression(update_expression).send().await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Ok(false); // Opponent's slot changed under us
                    }
                }
                Err(MatchRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }
}
