//! Persisted conversation state: sessions and their ordered messages.

mod convert;
mod id;
mod message;
mod state;

pub use convert::to_chat_messages;
pub use id::SessionId;
pub use message::{Message, MessageRole};
pub use state::{truncate_title, Session, SessionSummary, DEFAULT_TITLE_MAX_CHARS};
