mod agent;
mod app;
mod logging;
mod model;
mod retrieval;
mod server;
mod storage;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TOP_K: usize = 3;
const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP: usize = 200;
const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

pub use agent::AgentConfig;
pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use model::ModelConfig;
pub use retrieval::RetrievalConfig;
pub use server::ServerConfig;
pub use storage::{SandboxConfig, StorageConfig};
