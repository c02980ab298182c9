//! Send-message use case: the orchestration state machine.
//!
//! Each send runs the same sequence to completion or failure:
//!
//! 1. Validate: blank input is rejected before any side effect
//! 2. AppendUser: the user turn is published to the store
//! 3. Dispatch: full history plus the advertised tool catalog goes to the
//!    completion gateway
//! 4. ExtractText: the first text block is the visible reply; a fixed
//!    fallback guarantees the user always sees a turn
//! 5. ToolFanout: tool-use directives are dispatched sequentially, in
//!    response order, each awaited before the next
//! 6. AppendAssistant: the reply becomes the assistant turn
//!
//! A provider failure aborts the operation after the user turn was
//! appended; the store keeps exactly that one new message.
//!
//! Sends are serialized per session by a single-flight lock: a second send
//! issued while one is in flight queues behind it instead of racing the
//! store.

use crate::ports::completion_gateway::{CompletionGateway, GatewayError, StreamEvent};
use crate::ports::tool_gateway::ToolGateway;
use crate::store::session_store::SessionStore;
use chatbridge_domain::{DomainError, Message};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Visible reply when the provider returns no text block at all.
const EMPTY_RESPONSE_FALLBACK: &str = "No response";

/// Errors that can occur during a send operation.
#[derive(Error, Debug)]
pub enum SendMessageError {
    /// Local validation failure; never reaches a transport.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Use case for sending a user message through the full round-trip.
pub struct SendMessageUseCase {
    completion: Arc<dyn CompletionGateway>,
    tools: Arc<dyn ToolGateway>,
    store: Arc<SessionStore>,
    /// When set, tool outcomes are appended to the conversation as system
    /// turns instead of being discarded after execution.
    append_tool_results: bool,
    send_lock: Mutex<()>,
}

impl SendMessageUseCase {
    pub fn new(
        completion: Arc<dyn CompletionGateway>,
        tools: Arc<dyn ToolGateway>,
        store: Arc<SessionStore>,
    ) -> Self {
        Self {
            completion,
            tools,
            store,
            append_tool_results: false,
            send_lock: Mutex::new(()),
        }
    }

    /// Keep tool outcomes in the conversation history as system turns.
    pub fn with_tool_results_in_history(mut self, keep: bool) -> Self {
        self.append_tool_results = keep;
        self
    }

    /// Execute a send operation and return the new assistant message.
    pub async fn execute(&self, content: &str) -> Result<Message, SendMessageError> {
        Message::validate_content(content)?;

        // One send at a time; later sends queue here
        let _guard = self.send_lock.lock().await;

        self.append_user_turn(content);
        let snapshot = self.store.current();

        let response = self
            .completion
            .complete(snapshot.messages(), snapshot.available_tools())
            .await?;
        debug!(
            blocks = response.content.len(),
            model = %response.model,
            "Completion response received"
        );

        let reply = response
            .first_text()
            .unwrap_or(EMPTY_RESPONSE_FALLBACK)
            .to_string();

        // Dispatch tool-use directives sequentially, in response order
        for invocation in response.tool_invocations() {
            info!(tool = %invocation.tool_name, "Dispatching tool call");
            let outcome = self.tools.call_tool(&invocation).await;
            if outcome.is_error {
                warn!(tool = %outcome.tool_name, "Tool call failed: {}", outcome.result);
            }
            if self.append_tool_results {
                self.store.update(|session| {
                    session.with_message(Message::system(format!(
                        "[{}] {}",
                        outcome.tool_name, outcome.result
                    )))
                });
            }
        }

        Ok(self.append_assistant_turn(reply))
    }

    /// Execute a send operation, forwarding text deltas as they arrive.
    ///
    /// The streaming decoder carries text only, so no tool fanout happens on
    /// this path. The collected reply is appended as the assistant turn once
    /// the stream completes.
    pub async fn execute_streaming(
        &self,
        content: &str,
        delta_tx: mpsc::Sender<String>,
    ) -> Result<Message, SendMessageError> {
        Message::validate_content(content)?;

        let _guard = self.send_lock.lock().await;

        self.append_user_turn(content);
        let snapshot = self.store.current();

        let mut handle = self
            .completion
            .complete_streaming(snapshot.messages(), snapshot.available_tools())
            .await?;

        let mut full_text = String::new();
        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    full_text.push_str(&chunk);
                    // Caller abandoning interest doesn't abort the operation
                    let _ = delta_tx.send(chunk).await;
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        full_text = text;
                    }
                    break;
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::Provider(e).into());
                }
            }
        }

        if full_text.is_empty() {
            full_text = EMPTY_RESPONSE_FALLBACK.to_string();
        }
        Ok(self.append_assistant_turn(full_text))
    }

    fn append_user_turn(&self, content: &str) {
        let message = Message::user(content);
        debug!(id = %message.id, "Appending user turn");
        let turn = message.clone();
        self.store.update(move |session| session.with_message(turn));
    }

    fn append_assistant_turn(&self, content: String) -> Message {
        let message = Message::assistant(content);
        debug!(id = %message.id, "Appending assistant turn");
        let turn = message.clone();
        self.store.update(move |session| session.with_message(turn));
        message
    }
}
