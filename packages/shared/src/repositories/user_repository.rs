use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::models::user::UserProfile;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserRepositoryError>;
    async fn put_profile(&self, profile: &UserProfile) -> Result<(), UserRepositoryError>;
    async fn top_profiles(&self, limit: usize) -> Result<Vec<UserProfile>, UserRepositoryError>;
}

pub struct DynamoDbUserRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbUserRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("USERS_TABLE").expect("USERS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| UserRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let profile: UserProfile =
                from_item(item).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
            Ok(profile)
        } else {
            Err(UserRepositoryError::NotFound)
        }
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
        let item =
            to_item(profile).map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| UserRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn top_profiles(&self, limit: usize) -> Result<Vec<UserProfile>, UserRepositoryError> {
        // The users table is small enough to scan; the leaderboard is a
        // sorted prefix of it.
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| UserRepositoryError::DynamoDb(e.to_string()))?;

        let mut profiles = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let profile: UserProfile = from_item(item)
                    .map_err(|e| UserRepositoryError::Serialization(e.to_string()))?;
                profiles.push(profile);
            }
        }

        profiles.sort_by(|a, b| b.stats.total_rank_points.cmp(&a.stats.total_rank_points));
        profiles.truncate(limit);

        Ok(profiles)
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    pub struct InMemoryUserRepository {
        pub profiles: Arc<Mutex<HashMap<String, UserProfile>>>,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserRepositoryError> {
            self.profiles
                .lock()
                .unwrap()
                .get(user_id)
                .cloned()
                .ok_or(UserRepositoryError::NotFound)
        }

        async fn put_profile(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
            self.profiles
                .lock()
                .unwrap()
                .insert(profile.user_id.clone(), profile.clone());
            Ok(())
        }

        async fn top_profiles(
            &self,
            limit: usize,
        ) -> Result<Vec<UserProfile>, UserRepositoryError> {
            let mut profiles: Vec<UserProfile> =
                self.profiles.lock().unwrap().values().cloned().collect();
            profiles.sort_by(|a, b| b.stats.total_rank_points.cmp(&a.stats.total_rank_points));
            profiles.truncate(limit);
            Ok(profiles)
        }
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let repository = InMemoryUserRepository::new();

        let result = repository.get_profile("nobody").await;
        assert!(matches!(result, Err(UserRepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_top_profiles_orders_by_points() {
        let repository = InMemoryUserRepository::new();

        let mut low = UserProfile::new("low");
        low.stats.total_rank_points = 10;
        let mut high = UserProfile::new("high");
        high.stats.total_rank_points = 90;

        repository.put_profile(&low).await.unwrap();
        repository.put_profile(&high).await.unwrap();

        let top = repository.top_profiles(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_id, "high");
    }
}
