//! Tool execution error types.
//!
//! Every variant renders to the exact text the model sees, since tool
//! failures are folded back into the conversation rather than propagated.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The resolved path escapes the sandbox root.
    #[error("Error: '{path}' is outside the allowed agent workspace.")]
    SandboxViolation { path: String },

    #[error("Error: file '{path}' does not exist.")]
    NotFound { path: String },

    #[error("Error: '{path}' is not a file.")]
    NotAFile { path: String },

    #[error("Error: '{path}' is not a directory.")]
    NotADirectory { path: String },

    #[error("Error while {action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Error: missing required argument '{0}'.")]
    MissingArgument(&'static str),

    /// Tool not found in registry.
    #[error("Sorry, the requested tool '{0}' could not be found.")]
    UnknownTool(String),
}

impl ToolError {
    pub(crate) fn io(action: &'static str, path: &str, source: io::Error) -> Self {
        ToolError::Io {
            action,
            path: path.to_string(),
            source,
        }
    }

    pub fn is_sandbox_violation(&self) -> bool {
        matches!(self, ToolError::SandboxViolation { .. })
    }
}
