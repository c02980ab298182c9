//! Session domain entities

use crate::core::error::DomainError;
use crate::tool::entities::ToolDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation (Entity)
///
/// Messages are immutable after creation: the id, content, role, and
/// timestamp are all fixed when the orchestrator appends the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Validate user-supplied message content before any side effect
    pub fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }
}

/// The full state of one chat conversation (Entity)
///
/// The session id is immutable after creation. The message sequence is
/// append-only during a run; the advertised tool set is replaced wholesale
/// on every successful listing, never patched incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: String,
    messages: Vec<Message>,
    available_tools: Vec<ToolDescriptor>,
    connected: bool,
}

impl ChatSession {
    /// Create a fresh session with a generated id and empty state
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            available_tools: Vec::new(),
            connected: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn available_tools(&self) -> &[ToolDescriptor] {
        &self.available_tools
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Copy-on-write: return a new session with the message appended
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Copy-on-write: return a new session with the advertised tool set replaced
    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.available_tools = tools;
        self
    }

    /// Copy-on-write: return a new session with the connection flag updated
    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
