use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::conversation::{Message, Session, SessionId, SessionSummary};

use super::error::StoreError;
use super::store::SessionStore;

/// Stores each session as one pretty-printed JSON document in a directory.
///
/// Writes go to a temporary sibling file that is renamed over the target, so
/// a reader never observes a half-written session.
#[derive(Debug)]
pub struct JsonSessionStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidSessionId(raw.to_string()));
        }
        Ok(self.dir.join(format!("{raw}.json")))
    }

    async fn read_session(path: &Path) -> Result<Option<Session>, StoreError> {
        match fs::read(path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let path = self.path_for(id)?;
        Self::read_session(&path).await
    }

    async fn save(
        &self,
        id: &SessionId,
        title: &str,
        messages: &[Message],
    ) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        let session = Session {
            id: id.clone(),
            title: title.to_string(),
            updated_at: Utc::now(),
            messages: messages.to_vec(),
        };
        let payload = serde_json::to_vec_pretty(&session)?;

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).await?;
        fs::rename(&tmp, &path).await?;
        log::debug!("saved session {} ({} messages)", id, messages.len());
        Ok(())
    }

    async fn list_titles(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut items = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(items),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match Self::read_session(&path).await {
                Ok(Some(session)) => items.push(session.summary()),
                Ok(None) => {}
                Err(err) => log::warn!("skipping unreadable session file {}: {err}", path.display()),
            }
        }
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(items)
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, StoreError> {
        let path = self.path_for(id)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
