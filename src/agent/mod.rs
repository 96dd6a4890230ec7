//! Single-hop orchestration: one model call, at most one tool, and a
//! follow-up call that turns the tool result into the answer.

mod call;
mod error;
mod model;
mod prompt;
mod turn;

pub use call::{
    find_call, parse_arguments, parse_call, ArgumentError, MalformedArgumentPolicy, RawCall,
    ToolCall,
};
pub use error::TurnError;
pub use model::ModelHandle;
pub use prompt::{first_prompt, follow_up_prompt, render_catalog, TOOL_OUTPUT_PREFIX};
pub use turn::{Agent, TurnOutput};
