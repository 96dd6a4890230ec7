use serde::Deserialize;

use super::{
    AgentConfig, LoggingConfig, ModelConfig, RetrievalConfig, SandboxConfig, ServerConfig,
    StorageConfig,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub retrieval: RetrievalConfig,
    pub sandbox: SandboxConfig,
    pub storage: StorageConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}
