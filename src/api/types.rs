use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::{Message, MessageRole, SessionSummary};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionList {
    pub sessions: Vec<SessionSummary>,
}

/// Wire form of a stored message; the browser client keys on `sender`.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub sender: &'static str,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(msg: Message) -> Self {
        Self {
            sender: match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "ai",
            },
            text: msg.text,
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionMessages {
    pub messages: Vec<MessageView>,
}
