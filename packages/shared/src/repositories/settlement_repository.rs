use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem, Update};
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use serde_dynamo::aws_sdk_dynamodb_1::{to_attribute_value, to_item};

use crate::models::user::UserProfile;
use crate::repositories::errors::settlement_repository_errors::SettlementRepositoryError;

/// A profile image to store plus the guard from the read it was derived
/// from: `rank_matches` grows by one on every settlement a player is
/// part of, so it detects any settlement that landed in between.
#[derive(Debug, Clone)]
pub struct ProfileWrite {
    pub profile: UserProfile,
    /// `rank_matches` at read time; `None` when the profile did not
    /// exist yet.
    pub prior_rank_matches: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// All writes committed.
    Applied,
    /// The match's `points_awarded` flag was already set; nothing was
    /// written.
    AlreadySettled,
    /// A profile changed between read and write; the caller must
    /// re-read and retry.
    ProfileConflict,
}

#[async_trait]
pub trait SettlementRepository: Send + Sync {
    /// Applies a completed match's settlement in one atomic write: flips
    /// `points_awarded` on the match (conditioned on it still being
    /// false) and stores both updated profiles (each conditioned on the
    /// stats it was computed from). No write sticks unless all three do.
    async fn award_points(
        &self,
        match_id: &str,
        winner: &ProfileWrite,
        loser: &ProfileWrite,
    ) -> Result<AwardOutcome, SettlementRepositoryError>;
}

pub struct DynamoDbSettlementRepository {
    pub client: Client,
    pub matches_table: String,
    pub users_table: String,
}

impl DynamoDbSettlementRepository {
    pub fn new(client: Client) -> Self {
        let matches_table =
            std::env::var("MATCHES_TABLE").expect("MATCHES_TABLE environment variable must be set");
        let users_table =
            std::env::var("USERS_TABLE").expect("USERS_TABLE environment variable must be set");
        Self {
            client,
            matches_table,
            users_table,
        }
    }

    fn profile_put(&self, write: &ProfileWrite) -> Result<Put, SettlementRepositoryError> {
        let item = to_item(&write.profile)
            .map_err(|e| SettlementRepositoryError::Serialization(e.to_string()))?;

        let put = Put::builder()
            .table_name(&self.users_table)
            .set_item(Some(item));

        // Settling another of this player's matches bumps rank_matches,
        // so conditioning on it rejects a write built from a stale read
        let put = match write.prior_rank_matches {
            Some(matches_at_read) => put
                .condition_expression("stats.rank_matches = :matches_at_read")
                .expression_attribute_values(
                    ":matches_at_read",
                    AttributeValue::N(matches_at_read.to_string()),
                ),
            None => put.condition_expression("attribute_not_exists(user_id)"),
        };

        put.build()
            .map_err(|e| SettlementRepositoryError::Transaction(e.to_string()))
    }
}

#[async_trait]
impl SettlementRepository for DynamoDbSettlementRepository {
    async fn award_points(
        &self,
        match_id: &str,
        winner: &ProfileWrite,
        loser: &ProfileWrite,
    ) -> Result<AwardOutcome, SettlementRepositoryError> {
        let awarded_at = to_attribute_value(Utc::now())
            .map_err(|e| SettlementRepositoryError::Serialization(e.to_string()))?;

        let transaction_items = vec![
            // Flip the idempotency flag on the match, guarded so the
            // whole transaction cancels if a competing settlement won.
            // This item is first; cancellation reasons keep that order.
            TransactWriteItem::builder()
                .update(
                    Update::builder()
                        .table_name(&self.matches_table)
                        .key("match_id", AttributeValue::S(match_id.to_string()))
                        .update_expression(
                            "SET points_awarded = :awarded, points_awarded_at = :awarded_at",
                        )
                        .condition_expression("points_awarded = :not_awarded")
                        .expression_attribute_values(":awarded", AttributeValue::Bool(true))
                        .expression_attribute_values(":not_awarded", AttributeValue::Bool(false))
                        .expression_attribute_values(":awarded_at", awarded_at)
                        .build()
                        .map_err(|e| SettlementRepositoryError::Transaction(e.to_string()))?,
                )
                .build(),
            TransactWriteItem::builder()
                .put(self.profile_put(winner)?)
                .build(),
            TransactWriteItem::builder()
                .put(self.profile_put(loser)?)
                .build(),
        ];

        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(transaction_items))
            .send()
            .await;

        match result {
            Ok(_) => Ok(AwardOutcome::Applied),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if let TransactWriteItemsError::TransactionCanceledException(cancelled) =
                        service_err.err()
                    {
                        // The match update is item 0: its condition
                        // failing means the match was already settled;
                        // otherwise a profile guard tripped
                        let match_flag_failed = cancelled
                            .cancellation_reasons()
                            .first()
                            .and_then(|reason| reason.code())
                            == Some("ConditionalCheckFailed");

                        if match_flag_failed {
                            return Ok(AwardOutcome::AlreadySettled);
                        }
                        return Ok(AwardOutcome::ProfileConflict);
                    }
                }
                Err(SettlementRepositoryError::Transaction(e.to_string()))
            }
        }
    }
}
