//! Chat backend in which a model answers user messages and may call one
//! tool per turn through a plain-text `Call: name(key='value')` protocol.
//!
//! # Architecture
//!
//! - `chat` / `embedding` / `health`: provider traits for the model server
//! - `backends::ollama`: the HTTP client implementing them
//! - `tools`: sandboxed file tools, the registry and the lazily built [`tools::ToolBox`]
//! - `retrieval`: the knowledge-base index behind `query_knowledge_base`
//! - `conversation` / `persistence`: session data and its storage
//! - `agent`: the single-hop orchestration loop
//! - `api`: axum routes over the agent (feature `api`)

pub mod agent;

#[cfg(feature = "api")]
pub mod api;

pub mod backends;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod health;
pub mod persistence;
pub mod retrieval;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{Agent, ModelHandle, TurnError, TurnOutput};
pub use chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole};
pub use error::ModelError;
