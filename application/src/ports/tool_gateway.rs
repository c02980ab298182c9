//! Tool gateway port
//!
//! Defines the interface for the tool-execution server. The adapter owns a
//! single persistent duplex channel; listing and individual calls are
//! fail-soft so a flaky tool server never blocks the chat.

use super::completion_gateway::GatewayError;
use async_trait::async_trait;
use chatbridge_domain::{ToolDescriptor, ToolInvocation, ToolOutcome};

/// Gateway for tool server communication
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Establish the duplex channel and send the protocol handshake.
    ///
    /// Fails only when the channel cannot be established or the handshake
    /// write fails.
    async fn connect(&self) -> Result<(), GatewayError>;

    /// Close the channel. Idempotent; safe to call when already disconnected.
    async fn disconnect(&self);

    /// Query the advertised tool set.
    ///
    /// Fail-soft: transport or parse failure yields an empty list rather
    /// than an error.
    async fn list_tools(&self) -> Vec<ToolDescriptor>;

    /// Execute a tool call.
    ///
    /// Fail-soft: any failure yields an outcome with the error flag set and
    /// a sentinel error string rather than an `Err`.
    async fn call_tool(&self, invocation: &ToolInvocation) -> ToolOutcome;

    /// Whether the channel is currently established
    fn is_connected(&self) -> bool;
}
