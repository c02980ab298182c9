//! Command/query facade consumed by the UI layer.
//!
//! Four narrow operations: connect, send-message, session-stream, and
//! list-tools. Inputs are validated before any transport is touched; every
//! fallible operation returns an explicit `Result`. No component here holds
//! a back-reference to the UI; consumers observe the session through the
//! replay-latest stream.

use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::ports::tool_gateway::ToolGateway;
use crate::store::session_store::SessionStore;
use crate::use_cases::connect::ConnectUseCase;
use crate::use_cases::send_message::{SendMessageError, SendMessageUseCase};
use chatbridge_domain::{ChatSession, Message, ToolDescriptor};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Facade over the orchestration layer
pub struct ChatService {
    store: Arc<SessionStore>,
    tools: Arc<dyn ToolGateway>,
    connect: ConnectUseCase,
    send: SendMessageUseCase,
}

impl ChatService {
    pub fn new(
        completion: Arc<dyn CompletionGateway>,
        tools: Arc<dyn ToolGateway>,
        append_tool_results: bool,
    ) -> Self {
        let store = Arc::new(SessionStore::new());
        let connect = ConnectUseCase::new(tools.clone(), store.clone());
        let send = SendMessageUseCase::new(completion, tools.clone(), store.clone())
            .with_tool_results_in_history(append_tool_results);
        Self {
            store,
            tools,
            connect,
            send,
        }
    }

    /// Connect to the tool server and populate the advertised tool set.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        self.connect.execute().await
    }

    /// Close the tool channel.
    pub async fn disconnect(&self) {
        self.connect.disconnect().await;
    }

    /// Send a user message and return the resulting assistant message.
    pub async fn send_message(&self, content: &str) -> Result<Message, SendMessageError> {
        self.send.execute(content).await
    }

    /// Send a user message, forwarding text deltas as they arrive.
    pub async fn send_message_streaming(
        &self,
        content: &str,
        delta_tx: mpsc::Sender<String>,
    ) -> Result<Message, SendMessageError> {
        self.send.execute_streaming(content, delta_tx).await
    }

    /// Subscribe to session updates (replays the latest value).
    pub fn session_stream(&self) -> watch::Receiver<ChatSession> {
        self.store.subscribe()
    }

    /// Synchronous snapshot of the current session.
    pub fn current_session(&self) -> ChatSession {
        self.store.current()
    }

    /// Re-query the advertised tool set and republish it.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, GatewayError> {
        if !self.tools.is_connected() {
            return Err(GatewayError::Connection(
                "tool server not connected".to_string(),
            ));
        }
        let tools = self.tools.list_tools().await;
        let advertised = tools.clone();
        self.store
            .update(move |session| session.with_tools(advertised));
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockCompletionGateway, MockToolGateway};
    use chatbridge_domain::{CompletionResponse, ContentBlock, StopReason};

    fn service(
        completion: Arc<MockCompletionGateway>,
        tools: Arc<MockToolGateway>,
    ) -> ChatService {
        ChatService::new(completion, tools, false)
    }

    #[tokio::test]
    async fn facade_round_trip_publishes_to_stream() {
        let completion = Arc::new(MockCompletionGateway::default());
        completion.push_response(Ok(CompletionResponse {
            id: "msg_1".to_string(),
            content: vec![ContentBlock::Text("hi there".to_string())],
            model: "claude-3-5-sonnet-20241022".to_string(),
            stop_reason: Some(StopReason::EndTurn),
        }));
        let tools = Arc::new(MockToolGateway::default());
        let svc = service(completion, tools);

        let mut stream = svc.session_stream();
        let assistant = svc.send_message("hello").await.unwrap();
        assert_eq!(assistant.content, "hi there");

        // The stream observes the final state without restarting
        stream.changed().await.unwrap();
        let latest = stream.borrow_and_update().clone();
        assert_eq!(latest.messages().last().unwrap().content, "hi there");
    }

    #[tokio::test]
    async fn empty_input_returns_failure_and_session_unchanged() {
        let completion = Arc::new(MockCompletionGateway::default());
        let tools = Arc::new(MockToolGateway::default());
        let svc = service(completion, tools);

        assert!(svc.send_message("").await.is_err());
        assert!(svc.current_session().messages().is_empty());
    }

    #[tokio::test]
    async fn list_tools_requires_connection() {
        let completion = Arc::new(MockCompletionGateway::default());
        let tools = Arc::new(MockToolGateway::default());
        let svc = service(completion, tools.clone());

        assert!(svc.list_tools().await.is_err());

        tools.set_tools(vec![ToolDescriptor::new("search", "Search the web")]);
        svc.connect().await.unwrap();

        let listed = svc.list_tools().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(svc.current_session().available_tools().len(), 1);
    }
}
