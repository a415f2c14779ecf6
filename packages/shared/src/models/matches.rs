use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

/// A graded solution one player handed in for a match.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Submission {
    pub code: String,
    pub language: String,
    pub submitted_at: DateTime<Utc>,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
}

/// A paired coding challenge session between exactly two users sharing
/// one problem. Matches are historical records and are never deleted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Match {
    pub match_id: String,
    pub player1: String,
    pub player2: String,
    pub problem_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub submissions: HashMap<String, Submission>,
    // Absent (not null) until decided, so attribute_exists(winner)
    // filters work against the store
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner: Option<String>,
    pub points_awarded: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub points_awarded_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(player1: &str, player2: &str, problem_id: &str) -> Self {
        Match {
            match_id: Uuid::new_v4().to_string(),
            player1: player1.to_string(),
            player2: player2.to_string(),
            problem_id: problem_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            status: MatchStatus::Matched,
            submissions: HashMap::new(),
            winner: None,
            points_awarded: false,
            points_awarded_at: None,
        }
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.player1 == user_id || self.player2 == user_id
    }

    pub fn both_submitted(&self) -> bool {
        self.submissions.contains_key(&self.player1) && self.submissions.contains_key(&self.player2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_fields() {
        let m = Match::new("player-a", "player-b", "two-sum");

        assert!(!m.match_id.is_empty());
        assert_eq!(m.player1, "player-a");
        assert_eq!(m.player2, "player-b");
        assert_eq!(m.problem_id, "two-sum");
        assert_eq!(m.status, MatchStatus::Matched);
        assert!(m.submissions.is_empty());
        assert!(m.winner.is_none());
        assert!(m.ended_at.is_none());
        assert!(!m.points_awarded);
        assert!(m.points_awarded_at.is_none());
    }

    #[test]
    fn test_match_id_uniqueness() {
        let m1 = Match::new("a", "b", "p");
        let m2 = Match::new("a", "b", "p");

        assert_ne!(m1.match_id, m2.match_id);
    }

    #[test]
    fn test_is_participant() {
        let m = Match::new("a", "b", "p");

        assert!(m.is_participant("a"));
        assert!(m.is_participant("b"));
        assert!(!m.is_participant("c"));
    }

    #[test]
    fn test_both_submitted() {
        let mut m = Match::new("a", "b", "p");
        assert!(!m.both_submitted());

        let submission = Submission {
            code: "print(1)".to_string(),
            language: "python".to_string(),
            submitted_at: Utc::now(),
            test_cases_passed: 1,
            total_test_cases: 1,
        };

        m.submissions.insert("a".to_string(), submission.clone());
        assert!(!m.both_submitted());

        m.submissions.insert("b".to_string(), submission);
        assert!(m.both_submitted());
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&MatchStatus::Completed).unwrap(),
            "\"completed\""
        );

        let deserialized: MatchStatus = serde_json::from_str("\"matched\"").unwrap();
        assert_eq!(deserialized, MatchStatus::Matched);
    }

    #[test]
    fn test_match_round_trips_through_json() {
        let mut m = Match::new("a", "b", "p");
        m.submissions.insert(
            "a".to_string(),
            Submission {
                code: "fn main() {}".to_string(),
                language: "rust".to_string(),
                submitted_at: Utc::now(),
                test_cases_passed: 3,
                total_test_cases: 5,
            },
        );

        let serialized = serde_json::to_string(&m).unwrap();
        let deserialized: Match = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.match_id, m.match_id);
        assert_eq!(deserialized.submissions.len(), 1);
        assert_eq!(deserialized.submissions["a"].test_cases_passed, 3);
    }
}
