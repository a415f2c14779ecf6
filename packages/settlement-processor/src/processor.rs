use std::sync::Arc;

use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::Error;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;
use tracing::{error, info, warn};

use shared::models::matches::{Match, MatchStatus};
use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::settlement_repository::DynamoDbSettlementRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::settlement_service::SettlementService;

#[derive(Clone)]
pub struct SettlementProcessor {
    service: SettlementService,
}

impl SettlementProcessor {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
        let user_repository = Arc::new(DynamoDbUserRepository::new(client.clone()));
        let settlement_repository = Arc::new(DynamoDbSettlementRepository::new(client));
        let service = SettlementService::new(match_repository, user_repository, settlement_repository);
        Self { service }
    }

    pub async fn process_event(&self, event: Event) -> Result<(), Error> {
        for game in completed_matches(event) {
            info!("Match {} completed, settling points", game.match_id);
            // Per-record failures are logged, never fail the batch;
            // the flag in the match item makes retries safe
            if let Err(e) = self.settle(&game.match_id).await {
                error!("Failed to settle match {}: {}", game.match_id, e);
            }
        }

        Ok(())
    }

    async fn settle(&self, match_id: &str) -> Result<(), Error> {
        let outcome = self.service.settle_match(match_id).await?;
        if outcome.already_processed {
            info!("Match {} already settled, nothing to do", match_id);
        }
        Ok(())
    }
}

/// Matches in the stream batch that are due for settlement: INSERT or
/// MODIFY images that are completed, decided and still unsettled.
fn completed_matches(event: Event) -> Vec<Match> {
    let mut due = Vec::new();
    for record in event.records {
        match record.event_name.as_str() {
            "INSERT" | "MODIFY" => match from_item(record.change.new_image.into()) {
                Ok(game) if ready_for_settlement(&game) => due.push(game),
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to deserialize match record: {}", e);
                }
            },
            "REMOVE" => {}
            other => {
                warn!("Unhandled event type: {}", other);
            }
        }
    }
    due
}

fn ready_for_settlement(game: &Match) -> bool {
    game.status == MatchStatus::Completed && game.winner.is_some() && !game.points_awarded
}
