//! TOML configuration.

mod error;
mod load;
mod paths;
mod types;

pub use error::ConfigError;
pub use load::{load_config, LoadedConfig};
pub use paths::{config_file, CONFIG_FILE_NAME};
pub use types::{
    AgentConfig, AppConfig, LoggingConfig, ModelConfig, RetrievalConfig, SandboxConfig,
    ServerConfig, StorageConfig,
};
