use axum::http::StatusCode;

use crate::agent::TurnError;
use crate::persistence::StoreError;

pub type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

pub fn not_found(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, msg.into())
}

pub fn internal_error(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.into())
}

pub fn service_unavailable(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, msg.into())
}

pub fn turn_error(err: TurnError) -> (StatusCode, String) {
    match err {
        TurnError::ModelUnavailable(e) => {
            log::error!("chat turn failed, model unavailable: {e}");
            service_unavailable(format!("The language model is unavailable: {e}"))
        }
        TurnError::Store(StoreError::InvalidSessionId(id)) => {
            bad_request(format!("Invalid session id: {id}"))
        }
        other => {
            log::error!("chat turn failed: {other}");
            internal_error(format!("Unexpected error while processing the chat: {other}"))
        }
    }
}

/// Maps a lookup failure on a path-supplied session id. Ids that could
/// never name a stored session are reported as missing.
pub fn session_error(id: &str, err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::InvalidSessionId(_) => not_found(format!("Session {id} not found.")),
        other => {
            log::error!("session {id} storage error: {other}");
            internal_error(format!("Error while accessing session {id}: {other}"))
        }
    }
}
