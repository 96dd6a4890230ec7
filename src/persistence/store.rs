use async_trait::async_trait;

use crate::conversation::{Message, Session, SessionId, SessionSummary};

use super::error::StoreError;

/// Storage contract for conversations.
///
/// Saves are whole-history upserts: the caller hands over the complete
/// ordered message list and the store replaces whatever it held for the id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    async fn save(
        &self,
        id: &SessionId,
        title: &str,
        messages: &[Message],
    ) -> Result<(), StoreError>;

    /// All sessions, most recently updated first.
    async fn list_titles(&self) -> Result<Vec<SessionSummary>, StoreError>;

    /// Returns whether a session was removed.
    async fn delete(&self, id: &SessionId) -> Result<bool, StoreError>;
}
