use std::sync::Arc;

use tracing::{info, warn};

use crate::models::matches::MatchStatus;
use crate::models::user::{RankTier, UserProfile};
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::settlement_repository::{
    AwardOutcome, ProfileWrite, SettlementRepository,
};
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::settlement_service_errors::SettlementServiceError;

const MAX_SETTLE_ATTEMPTS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementOutcome {
    pub success: bool,
    pub already_processed: bool,
}

#[derive(Clone)]
pub struct SettlementService {
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    settlement_repository: Arc<dyn SettlementRepository + Send + Sync>,
}

impl SettlementService {
    pub fn new(
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        settlement_repository: Arc<dyn SettlementRepository + Send + Sync>,
    ) -> Self {
        SettlementService {
            match_repository,
            user_repository,
            settlement_repository,
        }
    }

    /// Applies rank points for a completed match exactly once. Keyed by
    /// match id; the `points_awarded` flag rides in the same transaction
    /// as the stat writes, and each profile write is guarded against the
    /// stats it was computed from, so neither a retry of this match nor
    /// a concurrent settlement of another match sharing a player can
    /// lose an award. Profile conflicts re-read and retry.
    pub async fn settle_match(
        &self,
        match_id: &str,
    ) -> Result<SettlementOutcome, SettlementServiceError> {
        for attempt in 1..=MAX_SETTLE_ATTEMPTS {
            let game = self
                .match_repository
                .get_match(match_id)
                .await?
                .ok_or(SettlementServiceError::MatchNotFound)?;

            if game.status != MatchStatus::Completed {
                return Err(SettlementServiceError::MatchNotCompleted);
            }
            let winner_id = game
                .winner
                .clone()
                .ok_or(SettlementServiceError::WinnerUndecided)?;

            if game.points_awarded {
                return Ok(SettlementOutcome {
                    success: true,
                    already_processed: true,
                });
            }

            let loser_id = if winner_id == game.player1 {
                game.player2.clone()
            } else {
                game.player1.clone()
            };

            let mut winner = self.profile_for_update(&winner_id).await?;
            let mut loser = self.profile_for_update(&loser_id).await?;

            winner.profile.stats.total_rank_points += 1;
            winner.profile.stats.rank_wins += 1;
            winner.profile.stats.rank_matches += 1;
            loser.profile.stats.rank_matches += 1;

            winner.profile.stats.rank = RankTier::from_points(winner.profile.stats.total_rank_points);
            loser.profile.stats.rank = RankTier::from_points(loser.profile.stats.total_rank_points);

            match self
                .settlement_repository
                .award_points(match_id, &winner, &loser)
                .await?
            {
                AwardOutcome::Applied => {
                    info!(
                        "Settled match {}: {} ({:?}) beat {} ({:?})",
                        match_id,
                        winner_id,
                        winner.profile.stats.rank,
                        loser_id,
                        loser.profile.stats.rank
                    );
                    return Ok(SettlementOutcome {
                        success: true,
                        already_processed: false,
                    });
                }
                AwardOutcome::AlreadySettled => {
                    info!("Match {} was settled by a concurrent writer", match_id);
                    return Ok(SettlementOutcome {
                        success: true,
                        already_processed: true,
                    });
                }
                AwardOutcome::ProfileConflict => {
                    warn!(
                        "Profile changed under settlement of match {} (attempt {}), retrying",
                        match_id, attempt
                    );
                }
            }
        }

        Err(SettlementServiceError::RepositoryError(format!(
            "profile writes for match {} kept conflicting with concurrent settlements",
            match_id
        )))
    }

    async fn profile_for_update(
        &self,
        user_id: &str,
    ) -> Result<ProfileWrite, SettlementServiceError> {
        match self.user_repository.get_profile(user_id).await {
            Ok(profile) => Ok(ProfileWrite {
                prior_rank_matches: Some(profile.stats.rank_matches),
                profile,
            }),
            Err(UserRepositoryError::NotFound) => Ok(ProfileWrite {
                profile: UserProfile::new(user_id),
                prior_rank_matches: None,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
