use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::conversation::{Message, Session, SessionId, SessionSummary};

use super::error::StoreError;
use super::store::SessionStore;

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(
        &self,
        id: &SessionId,
        title: &str,
        messages: &[Message],
    ) -> Result<(), StoreError> {
        let session = Session {
            id: id.clone(),
            title: title.to_string(),
            updated_at: Utc::now(),
            messages: messages.to_vec(),
        };
        self.sessions.write().await.insert(id.clone(), session);
        Ok(())
    }

    async fn list_titles(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut items: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .values()
            .map(Session::summary)
            .collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(items)
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_replaces_whole_history() {
        let store = MemorySessionStore::new();
        let id = SessionId::from("s");
        store
            .save(&id, "t", &[Message::user("a"), Message::assistant("b")])
            .await
            .unwrap();
        store.save(&id, "t", &[Message::user("c")]).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].text, "c");
        assert_eq!(store.len().await, 1);
    }
}
