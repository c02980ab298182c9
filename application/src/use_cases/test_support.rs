//! Hand-rolled mock gateways for use-case tests.

use crate::ports::completion_gateway::{
    CompletionGateway, GatewayError, StreamEvent, StreamHandle,
};
use crate::ports::tool_gateway::ToolGateway;
use async_trait::async_trait;
use chatbridge_domain::{
    CompletionResponse, Message, ToolDescriptor, ToolInvocation, ToolOutcome,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Semaphore, mpsc};

/// Scripted completion gateway recording every request it receives.
#[derive(Default)]
pub struct MockCompletionGateway {
    responses: Mutex<VecDeque<Result<CompletionResponse, GatewayError>>>,
    streams: Mutex<VecDeque<Vec<StreamEvent>>>,
    requests: Mutex<Vec<(Vec<Message>, Vec<ToolDescriptor>)>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockCompletionGateway {
    pub fn push_response(&self, response: Result<CompletionResponse, GatewayError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Make every completion wait for a permit, so tests can hold a send
    /// in flight while issuing another.
    pub fn gate_completions(&self, gate: Arc<Semaphore>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn push_stream(&self, events: Vec<StreamEvent>) {
        self.streams.lock().unwrap().push_back(events);
    }

    pub fn requests(&self) -> Vec<(Vec<Message>, Vec<ToolDescriptor>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for MockCompletionGateway {
    async fn complete(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<CompletionResponse, GatewayError> {
        self.requests
            .lock()
            .unwrap()
            .push((history.to_vec(), tools.to_vec()));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::Provider("no scripted response".to_string())))
    }

    async fn complete_streaming(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<StreamHandle, GatewayError> {
        self.requests
            .lock()
            .unwrap()
            .push((history.to_vec(), tools.to_vec()));
        let events = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GatewayError::Provider("no scripted stream".to_string()))?;
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            let _ = tx.send(event).await;
        }
        Ok(StreamHandle::new(rx))
    }
}

/// Scripted tool gateway recording every invocation.
#[derive(Default)]
pub struct MockToolGateway {
    connected: AtomicBool,
    connect_error: Mutex<Option<String>>,
    tools: Mutex<Vec<ToolDescriptor>>,
    call_results: Mutex<HashMap<String, String>>,
    fail_all_calls: AtomicBool,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl MockToolGateway {
    pub fn set_tools(&self, tools: Vec<ToolDescriptor>) {
        *self.tools.lock().unwrap() = tools;
    }

    pub fn set_call_result(&self, name: &str, result: &str) {
        self.call_results
            .lock()
            .unwrap()
            .insert(name.to_string(), result.to_string());
    }

    pub fn fail_connect(&self, message: &str) {
        *self.connect_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_calls(&self) {
        self.fail_all_calls.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolGateway for MockToolGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        if let Some(message) = self.connect_error.lock().unwrap().clone() {
            return Err(GatewayError::Connection(message));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.lock().unwrap().clone()
    }

    async fn call_tool(&self, invocation: &ToolInvocation) -> ToolOutcome {
        self.calls.lock().unwrap().push(invocation.clone());
        if self.fail_all_calls.load(Ordering::SeqCst) {
            return ToolOutcome::error(&invocation.tool_name, "Error executing tool");
        }
        match self.call_results.lock().unwrap().get(&invocation.tool_name) {
            Some(result) => ToolOutcome::success(&invocation.tool_name, result),
            None => ToolOutcome::success(&invocation.tool_name, ""),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
