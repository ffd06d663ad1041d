use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MessageSender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: MessageSender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageSender::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageSender::Assistant, content)
    }
}
