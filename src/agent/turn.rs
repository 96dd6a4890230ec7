use std::sync::Arc;

use crate::chat::ChatProvider;
use crate::conversation::{Message, Session, SessionId, DEFAULT_TITLE_MAX_CHARS};
use crate::persistence::SessionStore;
use crate::tools::{ToolBox, ToolRegistry};

use super::call::{find_call, MalformedArgumentPolicy, ToolCall};
use super::error::TurnError;
use super::model::ModelHandle;
use super::prompt::{first_prompt, follow_up_prompt, render_catalog};

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    pub response: String,
    pub session_id: SessionId,
    /// The tool call the model made, if any.
    pub tool: Option<ToolCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnState {
    AwaitingFirstModelCall,
    ParsedNoTool,
    ParsedToolCall,
    ToolExecuted,
    AwaitingSecondModelCall,
    Done,
}

/// Runs single-hop turns: one model call, at most one tool, and a second
/// model call only when a tool ran.
pub struct Agent {
    model: Arc<ModelHandle>,
    tools: Arc<ToolBox>,
    store: Arc<dyn SessionStore>,
    policy: MalformedArgumentPolicy,
    title_max_chars: usize,
}

impl Agent {
    pub fn new(model: Arc<ModelHandle>, tools: Arc<ToolBox>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            model,
            tools,
            store,
            policy: MalformedArgumentPolicy::default(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    pub fn with_policy(mut self, policy: MalformedArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_title_max_chars(mut self, max_chars: usize) -> Self {
        self.title_max_chars = max_chars;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handles one user message. The session is created when `session_id`
    /// is absent or unknown; the whole history is saved only on success.
    pub async fn process_turn(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<TurnOutput, TurnError> {
        let session_id = SessionId::resolve(session_id);
        let mut session = self
            .store
            .load(&session_id)
            .await?
            .unwrap_or_else(|| Session::new(session_id.clone()));
        let history = session.messages.clone();
        session.push_message(Message::user(message));

        let mut state = TurnState::AwaitingFirstModelCall;
        log::debug!("turn {session_id}: {state:?}");

        let model = self.model.get().await.map_err(TurnError::ModelUnavailable)?;
        let registry = self.tools.registry().await;
        let catalog = render_catalog(&registry.catalog());

        let first_output = model
            .chat_text(&first_prompt(&history, message, &catalog))
            .await
            .map_err(TurnError::Model)?;

        let (response, tool) = match find_call(&first_output) {
            None => {
                state = transition(&session_id, state, TurnState::ParsedNoTool);
                (first_output, None)
            }
            Some(raw) => {
                state = transition(&session_id, state, TurnState::ParsedToolCall);
                let name = raw.name.to_string();
                let args = self.policy.apply(raw.arguments);
                match registry.resolve(&name) {
                    Err(err) => {
                        log::warn!("model requested unknown tool '{name}'");
                        let call = ToolCall {
                            name,
                            args: args.unwrap_or_default(),
                        };
                        (err.to_string(), Some(call))
                    }
                    Ok(descriptor) => {
                        let (tool_output, call) = match args {
                            Ok(args) => {
                                log::info!("calling tool {name}({args})");
                                let output = descriptor.handler.call(args.clone()).await;
                                (output, ToolCall { name, args })
                            }
                            Err(err) => (
                                format!(
                                    "Error: could not parse arguments for tool '{name}': {err}"
                                ),
                                ToolCall {
                                    name,
                                    args: Default::default(),
                                },
                            ),
                        };
                        state = transition(&session_id, state, TurnState::ToolExecuted);
                        state =
                            transition(&session_id, state, TurnState::AwaitingSecondModelCall);
                        let answer = self
                            .second_call(
                                model.as_ref(),
                                &history,
                                message,
                                &first_output,
                                &tool_output,
                            )
                            .await?;
                        (answer, Some(call))
                    }
                }
            }
        };

        session.push_message(Message::assistant(response.clone()));
        let title = self.title_for(&session);
        self.store
            .save(&session_id, &title, &session.messages)
            .await?;
        transition(&session_id, state, TurnState::Done);

        Ok(TurnOutput {
            response,
            session_id,
            tool,
        })
    }

    async fn second_call(
        &self,
        model: &dyn ChatProvider,
        history: &[Message],
        message: &str,
        first_output: &str,
        tool_output: &str,
    ) -> Result<String, TurnError> {
        model
            .chat_text(&follow_up_prompt(history, message, first_output, tool_output))
            .await
            .map_err(TurnError::Model)
    }

    fn title_for(&self, session: &Session) -> String {
        session
            .derived_title(self.title_max_chars)
            .unwrap_or_else(|| session.title.clone())
    }

    /// The registry the next turn will offer, initializing it if needed.
    pub async fn registry(&self) -> &ToolRegistry {
        self.tools.registry().await
    }
}

fn transition(session_id: &SessionId, from: TurnState, to: TurnState) -> TurnState {
    log::debug!("turn {session_id}: {from:?} -> {to:?}");
    to
}
