//! Claude completion gateway.
//!
//! Stateless request/response calls to the messages endpoint. Each call
//! carries the full conversation history; failures wrap network and parse
//! faults in a provider error that is terminal for that one send.
//!
//! The streaming path issues the same request with `stream: true` and
//! decodes server-sent events incrementally: `content_block_delta` frames
//! carry text deltas, `message_stop` terminates the stream, and error
//! payloads surface as stream errors.

use crate::claude::types::{self, ClaudeResponse};
use async_trait::async_trait;
use chatbridge_application::ports::completion_gateway::{
    CompletionGateway, GatewayError, StreamEvent, StreamHandle,
};
use chatbridge_domain::{CompletionResponse, Message, ToolDescriptor};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-api-key";
const VERSION_HEADER: &str = "anthropic-version";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Gateway to a Claude-style messages endpoint
pub struct ClaudeCompletionGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeCompletionGateway {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    async fn post(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
        stream: bool,
    ) -> Result<reqwest::Response, GatewayError> {
        let request = types::build_request(&self.model, self.max_tokens, history, tools, stream);
        debug!(
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            stream,
            "Dispatching completion request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(VERSION_HEADER, ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|err| GatewayError::Provider(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!("HTTP {status}: {body}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionGateway for ClaudeCompletionGateway {
    async fn complete(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<CompletionResponse, GatewayError> {
        let response = self.post(history, tools, false).await?;
        let parsed: ClaudeResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Provider(format!("malformed response: {err}")))?;
        Ok(parsed.into())
    }

    async fn complete_streaming(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.post(history, tools, true).await?;
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        let _ = tx.send(StreamEvent::Error(err.to_string())).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim_end_matches('\r').to_string();
                    buffer.drain(..=newline);
                    match decode_sse_line(&line) {
                        SseEvent::Delta(text) => {
                            // Caller dropping the handle just ends delivery
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                return;
                            }
                        }
                        SseEvent::Stop => {
                            let _ = tx.send(StreamEvent::Completed(String::new())).await;
                            return;
                        }
                        SseEvent::Error(message) => {
                            let _ = tx.send(StreamEvent::Error(message)).await;
                            return;
                        }
                        SseEvent::Ignore => {}
                    }
                }
            }
            // Stream ended without message_stop
            warn!("Completion stream ended without a stop event");
            let _ = tx.send(StreamEvent::Completed(String::new())).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Decoded meaning of one server-sent-event line
#[derive(Debug, PartialEq)]
enum SseEvent {
    Delta(String),
    Stop,
    Error(String),
    Ignore,
}

fn decode_sse_line(line: &str) -> SseEvent {
    let Some(payload) = line.strip_prefix("data:").map(str::trim_start) else {
        return SseEvent::Ignore;
    };
    if payload.is_empty() {
        return SseEvent::Ignore;
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return SseEvent::Ignore,
    };

    match value.get("type").and_then(|v| v.as_str()) {
        Some("content_block_delta") => {
            let text = value
                .pointer("/delta/text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            if text.is_empty() {
                SseEvent::Ignore
            } else {
                SseEvent::Delta(text.to_string())
            }
        }
        Some("message_stop") => SseEvent::Stop,
        Some("error") => {
            let message = value
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("provider stream error")
                .to_string();
            SseEvent::Error(message)
        }
        _ => SseEvent::Ignore,
    }
}
