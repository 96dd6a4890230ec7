use axum::{
    extract::{Path, State},
    Json,
};

use super::helpers::{internal_error, not_found, session_error, ApiResult};
use crate::api::types::{SessionList, SessionMessages, StatusMessage};
use crate::api::ServerState;
use crate::conversation::SessionId;

pub async fn list_sessions(State(state): State<ServerState>) -> ApiResult<Json<SessionList>> {
    let sessions = state.agent.store().list_titles().await.map_err(|e| {
        log::error!("listing sessions failed: {e}");
        internal_error(format!("Error while loading the session list: {e}"))
    })?;
    Ok(Json(SessionList { sessions }))
}

pub async fn get_session(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionMessages>> {
    let session = state
        .agent
        .store()
        .load(&SessionId::from(id.as_str()))
        .await
        .map_err(|e| session_error(&id, e))?
        .ok_or_else(|| not_found(format!("Session {id} not found.")))?;

    Ok(Json(SessionMessages {
        messages: session.messages.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_session(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let removed = state
        .agent
        .store()
        .delete(&SessionId::from(id.as_str()))
        .await
        .map_err(|e| session_error(&id, e))?;

    if !removed {
        return Err(not_found(format!("Session {id} not found.")));
    }
    log::info!("deleted session {id}");
    Ok(Json(StatusMessage {
        message: format!("Session {id} deleted successfully."),
    }))
}
