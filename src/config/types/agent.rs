use serde::Deserialize;

use crate::agent::MalformedArgumentPolicy;
use crate::conversation::DEFAULT_TITLE_MAX_CHARS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub malformed_arguments: MalformedArgumentPolicy,
    pub title_max_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            malformed_arguments: MalformedArgumentPolicy::default(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}
