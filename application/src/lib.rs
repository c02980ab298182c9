//! Application layer for chatbridge
//!
//! This crate contains the session store, port definitions, and the
//! orchestration use cases. It depends only on the domain layer; the
//! transport adapters implementing the ports live in the infrastructure
//! layer.

pub mod chat_service;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use chat_service::ChatService;
pub use ports::{
    completion_gateway::{CompletionGateway, GatewayError, StreamEvent, StreamHandle},
    tool_gateway::ToolGateway,
};
pub use store::session_store::SessionStore;
pub use use_cases::{
    connect::ConnectUseCase,
    send_message::{SendMessageError, SendMessageUseCase},
};
