use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::models::matches::{Match, MatchStatus, Submission};
use crate::repositories::match_repository::MatchRepository;
use crate::services::errors::match_service_errors::MatchServiceError;

const MAX_SUBMIT_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository + Send + Sync>) -> Self {
        MatchService { repository }
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchServiceError> {
        self.repository
            .get_match(match_id)
            .await
            .map_err(MatchServiceError::from)
    }

    /// Records a graded submission. Returns `Ok(false)` when the match
    /// does not exist, the caller is not one of its players, or the
    /// match has already finished. A player may overwrite their own
    /// submission until the match completes. An opponent submission
    /// landing between the read and the write fails the write's guard;
    /// the merge is then redone against the fresh image.
    pub async fn submit_solution(
        &self,
        match_id: &str,
        user_id: &str,
        code: &str,
        language: &str,
        test_cases_passed: u32,
        total_test_cases: u32,
    ) -> Result<bool, MatchServiceError> {
        for attempt in 1..=MAX_SUBMIT_ATTEMPTS {
            let Some(mut game) = self.repository.get_match(match_id).await? else {
                warn!("Submission for unknown match {}", match_id);
                return Ok(false);
            };

            if !game.is_participant(user_id) {
                warn!("User {} is not a participant of match {}", user_id, match_id);
                return Ok(false);
            }

            if matches!(game.status, MatchStatus::Completed | MatchStatus::Cancelled) {
                return Ok(false);
            }

            let opponent = if game.player1 == user_id {
                game.player2.clone()
            } else {
                game.player1.clone()
            };
            let opponent_had_submitted = game.submissions.contains_key(&opponent);

            game.submissions.insert(
                user_id.to_string(),
                Submission {
                    code: code.to_string(),
                    language: language.to_string(),
                    submitted_at: Utc::now(),
                    test_cases_passed,
                    total_test_cases,
                },
            );

            if game.both_submitted() {
                game.status = MatchStatus::Completed;
                game.ended_at = Some(Utc::now());
                game.winner = decide_winner(&game);
            } else {
                game.status = MatchStatus::InProgress;
            }

            // One write carries the caller's slot, status and winner
            // together; points_awarded is left untouched
            if self
                .repository
                .record_submission(&game, user_id, opponent_had_submitted)
                .await?
            {
                if game.status == MatchStatus::Completed {
                    info!(
                        "Match {} completed, winner: {:?}",
                        game.match_id, game.winner
                    );
                }
                return Ok(true);
            }

            warn!(
                "Opponent submitted concurrently on match {} (attempt {}), re-reading",
                match_id, attempt
            );
        }

        Err(MatchServiceError::RepositoryError(format!(
            "submission for match {} kept conflicting with concurrent writes",
            match_id
        )))
    }
}

/// Winner of a match with both submissions in: more test cases passed
/// wins; on a tie the earlier submission wins; an exact tie goes to
/// player1. Always decides, there is no draw state.
pub fn decide_winner(game: &Match) -> Option<String> {
    let player1_entry = game.submissions.get(&game.player1)?;
    let player2_entry = game.submissions.get(&game.player2)?;

    if player1_entry.test_cases_passed != player2_entry.test_cases_passed {
        if player1_entry.test_cases_passed > player2_entry.test_cases_passed {
            return Some(game.player1.clone());
        }
        return Some(game.player2.clone());
    }

    if player1_entry.submitted_at <= player2_entry.submitted_at {
        Some(game.player1.clone())
    } else {
        Some(game.player2.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::repositories::match_repository::tests::InMemoryMatchRepository;

    fn submission(passed: u32, total: u32, offset_ms: i64) -> Submission {
        Submission {
            code: "code".to_string(),
            language: "python".to_string(),
            submitted_at: Utc::now() + Duration::milliseconds(offset_ms),
            test_cases_passed: passed,
            total_test_cases: total,
        }
    }

    #[test]
    fn test_winner_by_test_cases_passed() {
        let mut game = Match::new("a", "b", "p");
        // b submitted earlier but passed fewer cases
        game.submissions.insert("a".to_string(), submission(5, 5, 1000));
        game.submissions.insert("b".to_string(), submission(3, 5, 0));

        assert_eq!(decide_winner(&game), Some("a".to_string()));
    }

    #[test]
    fn test_winner_tie_broken_by_submission_time() {
        let mut game = Match::new("a", "b", "p");
        game.submissions.insert("a".to_string(), submission(4, 5, 100));
        game.submissions.insert("b".to_string(), submission(4, 5, 200));

        assert_eq!(decide_winner(&game), Some("a".to_string()));

        let mut reversed = Match::new("a", "b", "p");
        reversed
            .submissions
            .insert("a".to_string(), submission(4, 5, 200));
        reversed
            .submissions
            .insert("b".to_string(), submission(4, 5, 100));

        assert_eq!(decide_winner(&reversed), Some("b".to_string()));
    }

    #[test]
    fn test_winner_exact_tie_goes_to_player1() {
        let mut game = Match::new("a", "b", "p");
        let at = Utc::now();
        let mut entry = submission(4, 5, 0);
        entry.submitted_at = at;
        game.submissions.insert("a".to_string(), entry.clone());
        game.submissions.insert("b".to_string(), entry);

        assert_eq!(decide_winner(&game), Some("a".to_string()));
    }

    #[test]
    fn test_no_winner_before_both_submit() {
        let mut game = Match::new("a", "b", "p");
        game.submissions.insert("a".to_string(), submission(5, 5, 0));

        assert_eq!(decide_winner(&game), None);
    }

    #[tokio::test]
    async fn test_first_submission_moves_match_in_progress() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let game = Match::new("a", "b", "p");
        repository.create_match(&game).await.unwrap();
        let service = MatchService::new(repository.clone());

        let accepted = service
            .submit_solution(&game.match_id, "a", "print(1)", "python", 2, 3)
            .await
            .unwrap();

        assert!(accepted);
        let stored = repository.get_match(&game.match_id).await.unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::InProgress);
        assert!(stored.winner.is_none());
        assert!(stored.ended_at.is_none());
    }

    #[tokio::test]
    async fn test_both_submissions_complete_the_match() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let game = Match::new("a", "b", "p");
        repository.create_match(&game).await.unwrap();
        let service = MatchService::new(repository.clone());

        // A passes everything, B does not: A wins regardless of order
        service
            .submit_solution(&game.match_id, "b", "x", "python", 2, 3)
            .await
            .unwrap();
        service
            .submit_solution(&game.match_id, "a", "y", "python", 3, 3)
            .await
            .unwrap();

        let stored = repository.get_match(&game.match_id).await.unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Completed);
        assert_eq!(stored.winner, Some("a".to_string()));
        assert!(stored.ended_at.is_some());
        assert!(!stored.points_awarded);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_before_completion() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let game = Match::new("a", "b", "p");
        repository.create_match(&game).await.unwrap();
        let service = MatchService::new(repository.clone());

        service
            .submit_solution(&game.match_id, "a", "first", "python", 1, 3)
            .await
            .unwrap();
        service
            .submit_solution(&game.match_id, "a", "second", "python", 3, 3)
            .await
            .unwrap();

        let stored = repository.get_match(&game.match_id).await.unwrap().unwrap();
        assert_eq!(stored.submissions.len(), 1);
        assert_eq!(stored.submissions["a"].code, "second");
        assert_eq!(stored.submissions["a"].test_cases_passed, 3);
        assert_eq!(stored.status, MatchStatus::InProgress);
    }

    #[tokio::test]
    async fn test_submission_rejected_after_completion() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let mut game = Match::new("a", "b", "p");
        game.status = MatchStatus::Completed;
        repository.create_match(&game).await.unwrap();
        let service = MatchService::new(repository);

        let accepted = service
            .submit_solution(&game.match_id, "a", "late", "python", 3, 3)
            .await
            .unwrap();

        assert!(!accepted);
    }

    #[tokio::test]
    async fn test_submission_rejected_for_non_participant() {
        let repository = Arc::new(InMemoryMatchRepository::new());
        let game = Match::new("a", "b", "p");
        repository.create_match(&game).await.unwrap();
        let service = MatchService::new(repository.clone());

        let accepted = service
            .submit_solution(&game.match_id, "intruder", "x", "python", 3, 3)
            .await
            .unwrap();

        assert!(!accepted);
        let stored = repository.get_match(&game.match_id).await.unwrap().unwrap();
        assert!(stored.submissions.is_empty());
    }

    #[tokio::test]
    async fn test_submission_rejected_for_unknown_match() {
        let service = MatchService::new(Arc::new(InMemoryMatchRepository::new()));

        let accepted = service
            .submit_solution("missing", "a", "x", "python", 3, 3)
            .await
            .unwrap();

        assert!(!accepted);
    }

    /// Match store that slips the opponent's submission into the stored
    /// match right after the first read, so the caller's write is built
    /// from an image that is already stale.
    struct InterleavingMatchRepository {
        inner: InMemoryMatchRepository,
        injected: std::sync::atomic::AtomicBool,
    }

    impl InterleavingMatchRepository {
        fn inject_opponent_submission(&self, match_id: &str) {
            let mut store = self.inner.matches.lock().unwrap();
            let game = store.get_mut(match_id).unwrap();
            game.submissions
                .insert("b".to_string(), submission(1, 3, -500));
            game.status = MatchStatus::InProgress;
        }
    }

    #[async_trait::async_trait]
    impl crate::repositories::match_repository::MatchRepository for InterleavingMatchRepository {
        async fn create_match(
            &self,
            game: &Match,
        ) -> Result<(), crate::repositories::errors::match_repository_errors::MatchRepositoryError>
        {
            self.inner.create_match(game).await
        }

        async fn get_match(
            &self,
            match_id: &str,
        ) -> Result<
            Option<Match>,
            crate::repositories::errors::match_repository_errors::MatchRepositoryError,
        > {
            let image = self.inner.get_match(match_id).await?;
            if image.is_some()
                && !self
                    .injected
                    .swap(true, std::sync::atomic::Ordering::SeqCst)
            {
                self.inject_opponent_submission(match_id);
            }
            Ok(image)
        }

        async fn find_active_match(
            &self,
            user_id: &str,
        ) -> Result<
            Option<Match>,
            crate::repositories::errors::match_repository_errors::MatchRepositoryError,
        > {
            self.inner.find_active_match(user_id).await
        }

        async fn record_submission(
            &self,
            game: &Match,
            user_id: &str,
            opponent_had_submitted: bool,
        ) -> Result<bool, crate::repositories::errors::match_repository_errors::MatchRepositoryError>
        {
            self.inner
                .record_submission(game, user_id, opponent_had_submitted)
                .await
        }
    }

    #[tokio::test]
    async fn test_concurrent_opponent_submission_is_not_lost() {
        let inner = InMemoryMatchRepository::new();
        let game = Match::new("a", "b", "p");
        inner.create_match(&game).await.unwrap();
        let repository = Arc::new(InterleavingMatchRepository {
            inner: inner.clone(),
            injected: std::sync::atomic::AtomicBool::new(false),
        });
        let service = MatchService::new(repository);

        // A's first write attempt races B's submission; the guard fails
        // it, the re-read sees both entries and completes the match
        let accepted = service
            .submit_solution(&game.match_id, "a", "y", "python", 3, 3)
            .await
            .unwrap();

        assert!(accepted);
        let stored = inner.get_match(&game.match_id).await.unwrap().unwrap();
        assert_eq!(stored.submissions.len(), 2);
        assert_eq!(stored.submissions["b"].test_cases_passed, 1);
        assert_eq!(stored.status, MatchStatus::Completed);
        assert_eq!(stored.winner, Some("a".to_string()));
    }
}
