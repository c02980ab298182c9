//! Connect use case.
//!
//! A two-step sequence: establish the tool channel, then query the
//! advertised tool set. A connection failure leaves the session
//! disconnected and surfaces to the caller; a listing failure is absorbed
//! into an empty tool set, since tools are supplementary to basic chat.

use crate::ports::completion_gateway::GatewayError;
use crate::ports::tool_gateway::ToolGateway;
use crate::store::session_store::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for connecting to the tool server
pub struct ConnectUseCase {
    tools: Arc<dyn ToolGateway>,
    store: Arc<SessionStore>,
}

impl ConnectUseCase {
    pub fn new(tools: Arc<dyn ToolGateway>, store: Arc<SessionStore>) -> Self {
        Self { tools, store }
    }

    /// Connect and populate the advertised tool set.
    pub async fn execute(&self) -> Result<(), GatewayError> {
        self.tools.connect().await?;

        // Fail-soft: the adapter degrades listing failures to an empty set
        let tools = self.tools.list_tools().await;
        if tools.is_empty() {
            warn!("Connected with no advertised tools");
        } else {
            info!(count = tools.len(), "Tool set advertised");
        }

        self.store
            .update(|session| session.with_connected(true).with_tools(tools));
        Ok(())
    }

    /// Close the tool channel and mark the session disconnected.
    pub async fn disconnect(&self) {
        self.tools.disconnect().await;
        self.store.update(|session| session.with_connected(false));
    }
}
