use axum::{extract::State, Json};

use super::helpers::{bad_request, turn_error, ApiResult};
use crate::api::types::{ChatRequest, ChatResponse, StatusMessage};
use crate::api::ServerState;

pub async fn handle_root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "toolchat backend is running.".to_string(),
    })
}

pub async fn handle_chat(
    State(state): State<ServerState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if req.message.trim().is_empty() {
        return Err(bad_request("Message must not be empty"));
    }

    let output = state
        .agent
        .process_turn(&req.message, req.session_id.as_deref())
        .await
        .map_err(turn_error)?;

    Ok(Json(ChatResponse {
        response: output.response,
        session_id: output.session_id.to_string(),
    }))
}
