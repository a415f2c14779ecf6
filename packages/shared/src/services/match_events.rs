use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::models::matches::{Match, MatchStatus};
use crate::repositories::match_watch_repository::MatchWatchRepository;
use crate::services::errors::match_service_errors::MatchServiceError;

/// A match-lifecycle event for one subscribed user.
#[derive(Debug, Clone)]
pub enum MatchEvent {
    /// A fresh pairing the user has not been told about yet.
    Found(Match),
    /// A known match moved forward (opponent submitted, match finished).
    Updated(Match),
}

/// Point-in-time view of a user's matches across both player slots.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub active: Vec<Match>,
    pub completed: Vec<Match>,
}

#[derive(Clone, Copy)]
enum WatchQuery {
    ActiveAsPlayer1,
    ActiveAsPlayer2,
    CompletedAsPlayer1,
    CompletedAsPlayer2,
}

/// Polls the four match queries for one user and merges them into a
/// single ordered event stream. Consumers receive each
/// `(match_id, status)` pair at most once, so redelivered snapshots
/// cannot double-fire "match found".
#[derive(Clone)]
pub struct MatchEventService {
    repository: Arc<dyn MatchWatchRepository + Send + Sync>,
    poll_interval: Duration,
}

impl MatchEventService {
    pub fn new(repository: Arc<dyn MatchWatchRepository + Send + Sync>) -> Self {
        MatchEventService {
            repository,
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// One-shot run of all four queries, for clients that poll over HTTP
    /// instead of holding a subscription.
    pub async fn snapshot(&self, user_id: &str) -> Result<MatchSnapshot, MatchServiceError> {
        let mut active = self.repository.active_matches_as_player1(user_id).await?;
        active.extend(self.repository.active_matches_as_player2(user_id).await?);

        let mut completed = self.repository.completed_matches_as_player1(user_id).await?;
        completed.extend(self.repository.completed_matches_as_player2(user_id).await?);
        completed.retain(|game| game.winner.is_some());

        Ok(MatchSnapshot { active, completed })
    }

    pub fn subscribe(&self, user_id: &str) -> MatchSubscription {
        let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<Match>(64);
        let (event_tx, event_rx) = mpsc::channel::<MatchEvent>(64);

        let queries = [
            WatchQuery::ActiveAsPlayer1,
            WatchQuery::ActiveAsPlayer2,
            WatchQuery::CompletedAsPlayer1,
            WatchQuery::CompletedAsPlayer2,
        ];

        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(queries.len() + 1);

        for query in queries {
            let repository = self.repository.clone();
            let tx = snapshot_tx.clone();
            let user_id = user_id.to_string();
            let poll_interval = self.poll_interval;

            tasks.push(tokio::spawn(async move {
                loop {
                    let result = match query {
                        WatchQuery::ActiveAsPlayer1 => {
                            repository.active_matches_as_player1(&user_id).await
                        }
                        WatchQuery::ActiveAsPlayer2 => {
                            repository.active_matches_as_player2(&user_id).await
                        }
                        WatchQuery::CompletedAsPlayer1 => {
                            repository.completed_matches_as_player1(&user_id).await
                        }
                        WatchQuery::CompletedAsPlayer2 => {
                            repository.completed_matches_as_player2(&user_id).await
                        }
                    };

                    match result {
                        Ok(matches) => {
                            for game in matches {
                                if tx.send(game).await.is_err() {
                                    return; // Subscriber is gone
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Match watch query failed for {}: {}", user_id, e);
                        }
                    }

                    tokio::time::sleep(poll_interval).await;
                }
            }));
        }
        drop(snapshot_tx);

        // Fan-in: the only task that talks to the subscriber, so events
        // come out strictly ordered
        tasks.push(tokio::spawn(async move {
            let mut seen: HashSet<(String, MatchStatus)> = HashSet::new();
            while let Some(game) = snapshot_rx.recv().await {
                if game.status == MatchStatus::Completed && game.winner.is_none() {
                    // Not final yet; wait for the winner to land
                    continue;
                }
                if !seen.insert((game.match_id.clone(), game.status)) {
                    continue;
                }

                let event = if game.status == MatchStatus::Matched {
                    MatchEvent::Found(game)
                } else {
                    MatchEvent::Updated(game)
                };
                if event_tx.send(event).await.is_err() {
                    return;
                }
            }
        }));

        MatchSubscription {
            events: event_rx,
            tasks,
        }
    }
}

/// Live subscription handle. Dropping it (or calling `unsubscribe`,
/// any number of times) tears down all polling tasks.
pub struct MatchSubscription {
    events: mpsc::Receiver<MatchEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl MatchSubscription {
    pub async fn recv(&mut self) -> Option<MatchEvent> {
        self.events.recv().await
    }

    pub fn unsubscribe(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.events.close();
    }
}

impl Drop for MatchSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
