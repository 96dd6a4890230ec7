//! HTTP front end for the agent.

mod handlers;
mod types;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::agent::Agent;

pub use handlers::{
    delete_session, get_session, handle_chat, handle_root, list_sessions, ApiResult,
};
pub use types::{ChatRequest, ChatResponse, MessageView, SessionList, SessionMessages, StatusMessage};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub agent: Arc<Agent>,
}

/// HTTP server wrapping an [`Agent`].
pub struct Server {
    state: ServerState,
    cors_origins: Vec<String>,
}

impl Server {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            state: ServerState { agent },
            cors_origins: Vec::new(),
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handle_root))
            .route("/api/chat", post(handle_chat))
            .route("/api/chat/sessions", get(list_sessions))
            .route("/api/chat/session/:id", get(get_session).delete(delete_session))
            .layer(cors_layer(&self.cors_origins))
            .with_state(self.state.clone())
    }

    /// Binds `addr` and serves until the process is stopped.
    pub async fn run(self, addr: &str) -> Result<(), std::io::Error> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
