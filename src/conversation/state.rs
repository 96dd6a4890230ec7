use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::SessionId;
use super::message::{Message, MessageRole};

pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

/// A persisted conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "session_id")]
    pub id: SessionId,
    pub title: String,
    #[serde(rename = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            title: String::new(),
            updated_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Title derived from the first user message, or `None` for a session
    /// without one.
    pub fn derived_title(&self, max_chars: usize) -> Option<String> {
        self.messages
            .iter()
            .find(|msg| msg.role == MessageRole::User)
            .map(|msg| truncate_title(&msg.text, max_chars))
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            title: self.title.clone(),
            timestamp: self.updated_at,
        }
    }
}

/// Listing entry for a stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Keeps the first `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_title(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut title = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        title.push_str("...");
    }
    title
}
