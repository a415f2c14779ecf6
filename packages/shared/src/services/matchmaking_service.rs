use std::sync::Arc;

use tracing::{info, warn};

use crate::models::matches::Match;
use crate::models::queue::QueueTicket;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::queue_repository::QueueRepository;
use crate::services::errors::matchmaking_service_errors::MatchmakingServiceError;
use crate::services::problem_service::ProblemService;

/// Result of a matchmaking request: either the caller is parked in the
/// queue, or a match (new or recovered) is waiting for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Waiting,
    Matched(String),
}

#[derive(Clone)]
pub struct MatchmakingService {
    queue_repository: Arc<dyn QueueRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    problem_service: ProblemService,
}

impl MatchmakingService {
    pub fn new(
        queue_repository: Arc<dyn QueueRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        problem_service: ProblemService,
    ) -> Self {
        MatchmakingService {
            queue_repository,
            match_repository,
            problem_service,
        }
    }

    /// Joining is idempotent: a caller already queued stays queued, a
    /// caller already in a live match gets that match back.
    pub async fn join(&self, user_id: &str) -> Result<JoinOutcome, MatchmakingServiceError> {
        if user_id.is_empty() {
            return Err(MatchmakingServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }

        if let Some(active) = self.match_repository.find_active_match(user_id).await? {
            info!(
                "User {} already has an in-flight match {}",
                user_id, active.match_id
            );
            return Ok(JoinOutcome::Matched(active.match_id));
        }

        if self.queue_repository.get_ticket(user_id).await?.is_some() {
            return Ok(JoinOutcome::Waiting);
        }

        let candidates = self.queue_repository.find_waiting_tickets().await?;
        for ticket in candidates.iter().filter(|t| t.user_id != user_id) {
            if !self.queue_repository.claim_ticket(&ticket.user_id).await? {
                // Another caller consumed this ticket first; try the next
                continue;
            }
            return self.create_match(user_id, ticket).await;
        }

        self.queue_repository
            .insert_ticket(&QueueTicket::new(user_id))
            .await?;
        info!("User {} queued for matchmaking", user_id);
        Ok(JoinOutcome::Waiting)
    }

    pub async fn cancel(&self, user_id: &str) -> Result<(), MatchmakingServiceError> {
        if user_id.is_empty() {
            return Err(MatchmakingServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }

        self.queue_repository.remove_tickets_for(user_id).await?;
        info!("User {} left the matchmaking queue", user_id);
        Ok(())
    }

    async fn create_match(
        &self,
        user_id: &str,
        opponent: &QueueTicket,
    ) -> Result<JoinOutcome, MatchmakingServiceError> {
        let result = self.build_and_store_match(user_id, opponent).await;

        match result {
            Ok(game) => {
                info!(
                    "Matched {} with {} on problem {} (match {})",
                    game.player1, game.player2, game.problem_id, game.match_id
                );
                Ok(JoinOutcome::Matched(game.match_id))
            }
            Err(e) => {
                // The opponent's ticket was already consumed by the
                // claim; put it back so they rejoin the pool
                warn!(
                    "Match creation with opponent {} failed, restoring their ticket: {}",
                    opponent.user_id, e
                );
                if let Err(restore_err) = self.queue_repository.insert_ticket(opponent).await {
                    warn!(
                        "Failed to restore ticket for {}: {}",
                        opponent.user_id, restore_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn build_and_store_match(
        &self,
        user_id: &str,
        opponent: &QueueTicket,
    ) -> Result<Match, MatchmakingServiceError> {
        let problem = self.problem_service.random_problem().await?;
        // The longer-waiting player takes the player1 slot
        let game = Match::new(&opponent.user_id, user_id, &problem.problem_id);
        self.match_repository.create_match(&game).await?;
        Ok(game)
    }
}
