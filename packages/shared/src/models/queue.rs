use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    Matched,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Matched => "matched",
        }
    }
}

/// One user's wait-for-opponent request.
/// Stored as a DynamoDB item keyed by `user_id`, so a user can hold at
/// most one ticket at a time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueTicket {
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    pub status: TicketStatus,
}

impl QueueTicket {
    pub fn new(user_id: &str) -> Self {
        QueueTicket {
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
            status: TicketStatus::Waiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_is_waiting() {
        let ticket = QueueTicket::new("user-1");

        assert_eq!(ticket.user_id, "user-1");
        assert_eq!(ticket.status, TicketStatus::Waiting);

        let now = Utc::now();
        assert!((now - ticket.joined_at).num_seconds() < 10);
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let serialized = serde_json::to_string(&TicketStatus::Waiting).unwrap();
        assert_eq!(serialized, "\"waiting\"");

        let deserialized: TicketStatus = serde_json::from_str("\"matched\"").unwrap();
        assert_eq!(deserialized, TicketStatus::Matched);
    }
}
