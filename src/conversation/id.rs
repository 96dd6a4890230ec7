use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque session identifier.
///
/// Freshly minted ids are UUID v4 strings. A non-blank caller-supplied id is
/// kept as given; stores may still refuse it, and the JSON store only accepts
/// ASCII letters, digits, `-` and `_` since the id becomes a file name.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the caller's id, or mints a new one when it is absent or blank.
    pub fn resolve(existing: Option<&str>) -> Self {
        match existing.map(str::trim) {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionId;

    #[test]
    fn resolve_keeps_existing_id() {
        assert_eq!(SessionId::resolve(Some("abc")).as_str(), "abc");
    }

    #[test]
    fn resolve_mints_for_missing_or_blank() {
        let minted = SessionId::resolve(None);
        assert!(uuid::Uuid::parse_str(minted.as_str()).is_ok());
        let blank = SessionId::resolve(Some("   "));
        assert_ne!(blank.as_str().trim(), "");
        assert_ne!(minted, blank);
    }
}
