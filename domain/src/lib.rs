//! Domain layer for chatbridge
//!
//! This crate contains the core chat entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`ChatSession`] is the full mutable state of one conversation: the
//! ordered message history, the set of tools advertised by the tool server,
//! and the connection flag. Sessions are value types; every mutation is a
//! copy-on-write transform applied by the application layer.
//!
//! ## Tools
//!
//! A [`ToolDescriptor`] is an externally executable capability advertised by
//! the tool server. The completion provider may respond with tool-use
//! directives, which the orchestrator turns into transient
//! [`ToolInvocation`] values.

pub mod core;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use self::core::error::DomainError;
pub use session::{
    entities::{ChatSession, Message, Role},
    response::{CompletionResponse, ContentBlock, StopReason},
};
pub use tool::entities::{ToolDescriptor, ToolInvocation, ToolOutcome};
