use crate::error::ModelError;
use crate::persistence::StoreError;

/// Failures that end a turn without an answer. Nothing is persisted for a
/// failed turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// No model instance could be obtained.
    #[error("model unavailable: {0}")]
    ModelUnavailable(#[source] ModelError),

    #[error("model call failed: {0}")]
    Model(#[source] ModelError),

    #[error("session storage failed: {0}")]
    Store(#[from] StoreError),
}

impl TurnError {
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, TurnError::ModelUnavailable(_))
    }
}
