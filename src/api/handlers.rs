#[path = "handlers/chat.rs"]
mod chat;

#[path = "handlers/sessions.rs"]
mod sessions;

#[path = "handlers/helpers.rs"]
mod helpers;

pub use chat::{handle_chat, handle_root};
pub use helpers::ApiResult;
pub use sessions::{delete_session, get_session, list_sessions};
