//! Tools the model can call: sandboxed file operations plus whatever the
//! [`ToolBox`] adds at startup.

mod definition;
mod error;
pub mod files;
mod registry;
mod sandbox;
mod toolbox;

pub use definition::{ToolArgs, ToolDescriptor, ToolHandler};
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use sandbox::Sandbox;
pub use toolbox::ToolBox;
