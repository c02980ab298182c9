//! Completion gateway port
//!
//! Defines the interface for the AI completion provider. Each call is
//! stateless and carries the full conversation history plus the currently
//! advertised tool catalog.

use async_trait::async_trait;
use chatbridge_domain::{CompletionResponse, Message, ToolDescriptor};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Tool-channel establishment or handshake failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Completion call failure, wrapping network or serialization faults
    #[error("Provider error: {0}")]
    Provider(String),

    /// Duplex channel closed while a request was still pending
    #[error("Transport closed")]
    TransportClosed,
}

/// An event in a streaming completion response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}

/// Handle to a streaming completion response.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::Provider(e));
                }
            }
        }
        // Channel closed without Completed; return what we have
        Ok(full_text)
    }
}

/// Gateway for completion provider communication
///
/// Implementations serialize the history and tool catalog into the
/// provider's wire schema. The role mapping must be total, and an empty
/// tool catalog must omit the tools field entirely rather than sending an
/// empty array.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the full conversation history and get a structured response
    async fn complete(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<CompletionResponse, GatewayError>;

    /// Send the full conversation history and stream the response text.
    ///
    /// Default implementation calls `complete()` and wraps the visible text
    /// in a single `Completed` event, so non-streaming gateways work
    /// without changes.
    async fn complete_streaming(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.complete(history, tools).await?;
        let text = response.first_text().unwrap_or_default().to_string();
        let (tx, rx) = mpsc::channel(1);
        // If the receiver is dropped, that's fine
        let _ = tx.send(StreamEvent::Completed(text)).await;
        Ok(StreamHandle::new(rx))
    }
}
