use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Human-readable rank tier, derived purely from accumulated rank points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankTier {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl RankTier {
    pub fn from_points(points: i64) -> Self {
        if points >= 100 {
            RankTier::Diamond
        } else if points >= 80 {
            RankTier::Platinum
        } else if points >= 60 {
            RankTier::Gold
        } else if points >= 30 {
            RankTier::Silver
        } else if points > 0 {
            RankTier::Bronze
        } else {
            RankTier::Unranked
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankStats {
    pub total_rank_points: i64,
    pub rank_wins: u32,
    pub rank_matches: u32,
    pub rank: RankTier,
}

impl Default for RankStats {
    fn default() -> Self {
        RankStats {
            total_rank_points: 0,
            rank_wins: 0,
            rank_matches: 0,
            rank: RankTier::Unranked,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub stats: RankStats,
}

impl UserProfile {
    /// Seeded profiles start with the user id as the display name; a
    /// signup flow can overwrite it later.
    pub fn new(user_id: &str) -> Self {
        UserProfile {
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            created_at: Utc::now(),
            stats: RankStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_tier_thresholds() {
        assert_eq!(RankTier::from_points(0), RankTier::Unranked);
        assert_eq!(RankTier::from_points(1), RankTier::Bronze);
        assert_eq!(RankTier::from_points(29), RankTier::Bronze);
        assert_eq!(RankTier::from_points(30), RankTier::Silver);
        assert_eq!(RankTier::from_points(59), RankTier::Silver);
        assert_eq!(RankTier::from_points(60), RankTier::Gold);
        assert_eq!(RankTier::from_points(79), RankTier::Gold);
        assert_eq!(RankTier::from_points(80), RankTier::Platinum);
        assert_eq!(RankTier::from_points(99), RankTier::Platinum);
        assert_eq!(RankTier::from_points(100), RankTier::Diamond);
        assert_eq!(RankTier::from_points(500), RankTier::Diamond);
    }

    #[test]
    fn test_rank_tier_negative_points_are_unranked() {
        assert_eq!(RankTier::from_points(-5), RankTier::Unranked);
    }

    #[test]
    fn test_new_profile_has_zeroed_stats() {
        let profile = UserProfile::new("user-1");

        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.username, "user-1");
        assert_eq!(profile.stats.total_rank_points, 0);
        assert_eq!(profile.stats.rank_wins, 0);
        assert_eq!(profile.stats.rank_matches, 0);
        assert_eq!(profile.stats.rank, RankTier::Unranked);
    }

    #[test]
    fn test_rank_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&RankTier::Diamond).unwrap(),
            "\"Diamond\""
        );
    }
}
