//! WebSocket tool gateway.
//!
//! Owns one persistent duplex channel to the tool server. Every request
//! frame carries a correlation id registered in a pending-request table; a
//! reader task dispatches each response to the awaiting caller by id, so
//! concurrent or out-of-order responses are never misassigned. Responses
//! with unknown ids are logged and dropped.

use crate::mcp::protocol::{self, RequestFrame, ResponseFrame};
use async_trait::async_trait;
use chatbridge_application::ports::completion_gateway::GatewayError;
use chatbridge_application::ports::tool_gateway::ToolGateway;
use chatbridge_domain::{ToolDescriptor, ToolInvocation, ToolOutcome};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, oneshot};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type PendingTable = Arc<StdMutex<HashMap<u64, oneshot::Sender<Result<serde_json::Value, String>>>>>;

/// Sentinel carried in a tool outcome when the call response cannot be parsed
const TOOL_RESULT_PARSE_ERROR: &str = "Error parsing tool result";

/// MCP tool gateway over a single WebSocket channel
pub struct McpToolGateway {
    server_url: String,
    writer: Mutex<Option<WsWriter>>,
    pending: PendingTable,
    next_id: AtomicU64,
    connected: Arc<AtomicBool>,
}

impl McpToolGateway {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            writer: Mutex::new(None),
            pending: Arc::new(StdMutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reader task: dispatch each response frame to its awaiting request.
    async fn run_reader(
        mut read: futures::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
        pending: PendingTable,
        connected: Arc<AtomicBool>,
    ) {
        while let Some(message) = read.next().await {
            match message {
                Ok(WsMessage::Text(text)) => Self::dispatch(&text, &pending),
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!("Tool channel read failed: {err}");
                    break;
                }
            }
        }
        connected.store(false, Ordering::SeqCst);
        // Dropping the senders wakes every awaiting request with a closed error
        pending.lock().unwrap_or_else(|e| e.into_inner()).clear();
        debug!("Tool channel reader stopped");
    }

    fn dispatch(text: &str, pending: &PendingTable) {
        let frame: ResponseFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("Discarding unparseable tool server frame: {err}");
                return;
            }
        };

        let sender = pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&frame.id);
        match sender {
            Some(tx) => {
                let _ = tx.send(frame.into_payload());
            }
            None => debug!(id = frame.id, "Response with unknown correlation id dropped"),
        }
    }

    /// Write a frame and await its correlated response.
    ///
    /// Transport faults map to `Connection`, server-side error frames to
    /// `Provider`, and a channel that closes while the request is pending
    /// to `TransportClosed`.
    async fn request(&self, frame: RequestFrame) -> Result<serde_json::Value, GatewayError> {
        let id = frame.id;
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, tx);

        let serialized = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(err) => {
                self.forget(id);
                return Err(GatewayError::Provider(format!(
                    "serialization failed: {err}"
                )));
            }
        };

        {
            let mut writer = self.writer.lock().await;
            let Some(writer) = writer.as_mut() else {
                self.forget(id);
                return Err(GatewayError::Connection("not connected".to_string()));
            };
            if let Err(err) = writer.send(WsMessage::Text(serialized)).await {
                self.forget(id);
                return Err(GatewayError::Connection(format!("write failed: {err}")));
            }
        }

        match rx.await {
            Ok(payload) => payload.map_err(GatewayError::Provider),
            Err(_) => Err(GatewayError::TransportClosed),
        }
    }

    fn forget(&self, id: u64) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    fn fresh_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl ToolGateway for McpToolGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        let (socket, _response) = connect_async(&self.server_url)
            .await
            .map_err(|err| GatewayError::Connection(format!("connect failed: {err}")))?;
        let (write, read) = socket.split();

        *self.writer.lock().await = Some(write);
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();

        tokio::spawn(Self::run_reader(
            read,
            self.pending.clone(),
            self.connected.clone(),
        ));

        // Handshake: declare capability interest. Only the write can fail the
        // connect; the server's reply arrives with an unregistered id and is
        // dropped by the reader.
        let handshake = RequestFrame::initialize(self.fresh_id());
        let serialized = serde_json::to_string(&handshake)
            .map_err(|err| GatewayError::Connection(format!("handshake failed: {err}")))?;
        {
            let mut writer = self.writer.lock().await;
            let Some(writer) = writer.as_mut() else {
                return Err(GatewayError::Connection("channel lost".to_string()));
            };
            writer
                .send(WsMessage::Text(serialized))
                .await
                .map_err(|err| GatewayError::Connection(format!("handshake write failed: {err}")))?;
        }

        self.connected.store(true, Ordering::SeqCst);
        debug!(url = %self.server_url, "Tool channel established");
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = writer.send(WsMessage::Close(None)).await;
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        let frame = RequestFrame::list_tools(self.fresh_id());
        match self.request(frame).await {
            Ok(result) => protocol::parse_tool_list(&result),
            Err(err) => {
                // Fail-soft: a flaky listing never blocks the chat
                warn!("Tool listing failed: {err}");
                Vec::new()
            }
        }
    }

    async fn call_tool(&self, invocation: &ToolInvocation) -> ToolOutcome {
        let frame = RequestFrame::call_tool(
            self.fresh_id(),
            &invocation.tool_name,
            &invocation.arguments,
        );
        match self.request(frame).await {
            Ok(result) => match protocol::parse_tool_result(&result) {
                Some(text) => ToolOutcome::success(&invocation.tool_name, text),
                None => ToolOutcome::error(&invocation.tool_name, TOOL_RESULT_PARSE_ERROR),
            },
            Err(err) => ToolOutcome::error(
                &invocation.tool_name,
                format!("Tool call failed: {err}"),
            ),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
