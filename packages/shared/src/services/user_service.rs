use std::sync::Arc;

use crate::models::user::UserProfile;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::user_service_errors::UserServiceError;

const MAX_LEADERBOARD_SIZE: usize = 100;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        UserService { repository }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserServiceError> {
        if user_id.is_empty() {
            return Err(UserServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_profile(user_id)
            .await
            .map_err(|e| match e {
                UserRepositoryError::NotFound => UserServiceError::UserNotFound,
                _ => UserServiceError::RepositoryError(e.to_string()),
            })
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<UserProfile>, UserServiceError> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_SIZE);
        self.repository
            .top_profiles(limit)
            .await
            .map_err(|e| UserServiceError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repositories::user_repository::MockUserRepository;

    #[tokio::test]
    async fn test_get_profile_maps_not_found() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_get_profile()
            .returning(|_| Err(UserRepositoryError::NotFound));
        let service = UserService::new(Arc::new(repository));

        let result = service.get_profile("nobody").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_get_profile_rejects_empty_id() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let result = service.get_profile("").await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_leaderboard_clamps_limit() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_top_profiles()
            .withf(|limit| *limit == MAX_LEADERBOARD_SIZE)
            .returning(|_| Ok(vec![]));
        let service = UserService::new(Arc::new(repository));

        let profiles = service.leaderboard(10_000).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_passes_through_profiles() {
        let mut repository = MockUserRepository::new();
        repository.expect_top_profiles().returning(|_| {
            let mut profile = UserProfile::new("leader");
            profile.stats.total_rank_points = 120;
            Ok(vec![profile])
        });
        let service = UserService::new(Arc::new(repository));

        let profiles = service.leaderboard(10).await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user_id, "leader");
    }
}
