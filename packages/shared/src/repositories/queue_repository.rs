use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::models::queue::{QueueTicket, TicketStatus};
use crate::repositories::errors::queue_repository_errors::QueueRepositoryError;

#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn insert_ticket(&self, ticket: &QueueTicket) -> Result<(), QueueRepositoryError>;

    async fn get_ticket(&self, user_id: &str) -> Result<Option<QueueTicket>, QueueRepositoryError>;

    /// All waiting tickets, oldest first.
    async fn find_waiting_tickets(&self) -> Result<Vec<QueueTicket>, QueueRepositoryError>;

    /// Atomically removes the user's ticket if it is still `waiting`.
    /// Returns `false` when another caller claimed it first.
    async fn claim_ticket(&self, user_id: &str) -> Result<bool, QueueRepositoryError>;

    async fn remove_tickets_for(&self, user_id: &str) -> Result<(), QueueRepositoryError>;
}

pub struct DynamoDbQueueRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbQueueRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("QUEUE_TABLE").expect("QUEUE_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl QueueRepository for DynamoDbQueueRepository {
    async fn insert_ticket(&self, ticket: &QueueTicket) -> Result<(), QueueRepositoryError> {
        let item =
            to_item(ticket).map_err(|e| QueueRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| QueueRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_ticket(&self, user_id: &str) -> Result<Option<QueueTicket>, QueueRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| QueueRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                let ticket: QueueTicket = from_item(item)
                    .map_err(|e| QueueRepositoryError::Serialization(e.to_string()))?;
                Ok(Some(ticket))
            }
            None => Ok(None),
        }
    }

    async fn find_waiting_tickets(&self) -> Result<Vec<QueueTicket>, QueueRepositoryError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#status = :waiting")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":waiting",
                AttributeValue::S(TicketStatus::Waiting.as_str().to_string()),
            )
            .send()
            .await
            .map_err(|e| QueueRepositoryError::DynamoDb(e.to_string()))?;

        let mut tickets = Vec::new();
        if let Some(items) = output.items {
            for item in items {
                let ticket: QueueTicket = from_item(item)
                    .map_err(|e| QueueRepositoryError::Serialization(e.to_string()))?;
                tickets.push(ticket);
            }
        }

        // Oldest first, so the longest-waiting player gets matched first
        tickets.sort_by_key(|ticket| ticket.joined_at);

        Ok(tickets)
    }

    async fn claim_ticket(&self, user_id: &str) -> Result<bool, QueueRepositoryError> {
        // Single conditional delete: the claim and the removal are one
        // atomic store operation, so two callers can never both consume
        // the same ticket.
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .condition_expression("#status = :waiting")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":waiting",
                AttributeValue::S(TicketStatus::Waiting.as_str().to_string()),
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Ok(false); // Ticket already claimed or gone
                    }
                }
                Err(QueueRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn remove_tickets_for(&self, user_id: &str) -> Result<(), QueueRepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| QueueRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }
}
