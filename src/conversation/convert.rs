use crate::chat::{ChatMessage, ChatRole};

use super::message::{Message, MessageRole};

/// Maps persisted history onto the model-facing representation.
pub fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|msg| ChatMessage {
            role: match msg.role {
                MessageRole::User => ChatRole::User,
                MessageRole::Assistant => ChatRole::Assistant,
            },
            content: msg.text.clone(),
        })
        .collect()
}
