//! Completion provider response types.
//!
//! The completion provider returns responses as an ordered list of content
//! blocks, mixing plain text and tool-use directives. [`CompletionResponse`]
//! models that structure independently of any one provider's wire format;
//! the infrastructure layer maps its own serde types into these.

use crate::tool::entities::ToolInvocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single block of content within a completion response.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    /// A text content block from the model.
    Text(String),

    /// A tool-use directive from the model.
    ToolUse {
        /// Provider-assigned id for this directive (e.g. "toolu_abc123").
        id: String,
        /// Name of the tool the model wants to call.
        name: String,
        /// Structured argument document.
        input: Map<String, Value>,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &Map<String, Value>)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model wants to call tools.
    ToolUse,
    /// Hit the token limit; response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

/// A structured response from the completion provider.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Provider-assigned message id.
    pub id: String,
    /// Content blocks in response order (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Model that produced the response.
    pub model: String,
    /// Why the model stopped generating, if reported.
    pub stop_reason: Option<StopReason>,
}

impl CompletionResponse {
    /// The first text block, which the orchestrator shows as the visible reply.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|b| b.as_text())
    }

    /// Extract all tool-use directives, preserving response order.
    pub fn tool_invocations(&self) -> Vec<ToolInvocation> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { name, input, .. } => {
                    Some(ToolInvocation::new(name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool-use directives.
    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
