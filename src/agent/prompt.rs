//! Prompt assembly for the two model calls of a turn.

use crate::chat::ChatMessage;
use crate::conversation::{to_chat_messages, Message};

pub const TOOL_OUTPUT_PREFIX: &str = "Tool Output: ";

const INSTRUCTIONS: &str = "\
To use a tool, respond in the following format:
Call: tool_name(param1='value1', param2='value2')
Thought: why you are calling the tool
If no tool is needed, respond with your final answer directly:
Final Answer: your answer to the user";

/// Renders the tool list and the response grammar appended to the user's
/// message on the first call.
pub fn render_catalog(catalog: &[(&str, &str)]) -> String {
    let mut text = String::from("\n\nAvailable tools:\n");
    for (name, description) in catalog {
        text.push_str("- ");
        text.push_str(name);
        text.push_str(": ");
        text.push_str(description);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(INSTRUCTIONS);
    text
}

/// First-call prompt: prior history, then the user's text with the catalog
/// appended. Only this ephemeral copy carries the catalog.
pub fn first_prompt(history: &[Message], user_text: &str, catalog_text: &str) -> Vec<ChatMessage> {
    let mut prompt = to_chat_messages(history);
    prompt.push(
        ChatMessage::user()
            .content(format!("{user_text}{catalog_text}"))
            .build(),
    );
    prompt
}

/// Second-call prompt: history, the raw user text, the model's tool-call
/// output and the tool result.
pub fn follow_up_prompt(
    history: &[Message],
    user_text: &str,
    model_output: &str,
    tool_output: &str,
) -> Vec<ChatMessage> {
    let mut prompt = to_chat_messages(history);
    prompt.push(ChatMessage::user().content(user_text).build());
    prompt.push(ChatMessage::assistant().content(model_output).build());
    prompt.push(
        ChatMessage::user()
            .content(format!("{TOOL_OUTPUT_PREFIX}{tool_output}"))
            .build(),
    );
    prompt
}
