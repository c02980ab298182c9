//! Claude messages API wire types and request mapping.
//!
//! The role mapping is total and deterministic: user and assistant map to
//! themselves, and system maps to **user**; the provider has no system
//! role inside the message array, so this is a deliberate lossy mapping.
//!
//! An empty tool catalog omits the `tools` field entirely; some providers
//! reject an empty tool array.

use chatbridge_domain::{
    CompletionResponse, ContentBlock, Message, Role, StopReason, ToolDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ClaudeRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ClaudeMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ClaudeTool>>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaudeMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaudeTool {
    pub name: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeResponse {
    pub id: String,
    pub role: String,
    pub content: Vec<ClaudeContentBlock>,
    pub model: String,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Map<String, Value>,
    },
    #[serde(other)]
    Unknown,
}

/// Map a domain role onto the provider's message-array roles
pub fn map_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        // No system turn in the provider's message array
        Role::System => "user",
    }
}

/// Build one request carrying the full history and the advertised catalog
pub fn build_request(
    model: &str,
    max_tokens: u32,
    history: &[Message],
    tools: &[ToolDescriptor],
    stream: bool,
) -> ClaudeRequest {
    let messages = history
        .iter()
        .map(|message| ClaudeMessage {
            role: map_role(message.role),
            content: message.content.clone(),
        })
        .collect();

    let tools = if tools.is_empty() {
        None
    } else {
        Some(
            tools
                .iter()
                .map(|tool| ClaudeTool {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    input_schema: tool.input_schema.clone(),
                })
                .collect(),
        )
    };

    ClaudeRequest {
        model: model.to_string(),
        max_tokens,
        messages,
        tools,
        stream,
    }
}

fn map_stop_reason(reason: String) -> StopReason {
    match reason.as_str() {
        "end_turn" => StopReason::EndTurn,
        "tool_use" => StopReason::ToolUse,
        "max_tokens" => StopReason::MaxTokens,
        _ => StopReason::Other(reason),
    }
}

impl From<ClaudeResponse> for CompletionResponse {
    fn from(response: ClaudeResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ClaudeContentBlock::Text { text } => Some(ContentBlock::Text(text)),
                ClaudeContentBlock::ToolUse { id, name, input } => {
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                ClaudeContentBlock::Unknown => None,
            })
            .collect();

        CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason: response.stop_reason.map(map_stop_reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_mapping_is_total_and_folds_system_into_user() {
        assert_eq!(map_role(Role::User), "user");
        assert_eq!(map_role(Role::Assistant), "assistant");
        assert_eq!(map_role(Role::System), "user");
    }

    #[test]
    fn empty_catalog_omits_the_tools_field_entirely() {
        let history = vec![Message::user("hello")];
        let request = build_request("claude-3-5-sonnet-20241022", 1024, &history, &[], false);

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none(), "tools must be absent, not []");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 1024);
    }

    #[test]
    fn catalog_entries_carry_name_description_and_schema() {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        let tools = vec![ToolDescriptor::new("search", "Search the web").with_schema(schema)];

        let request = build_request(
            "claude-3-5-sonnet-20241022",
            1024,
            &[Message::user("go")],
            &tools,
            false,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tools"][0]["name"], "search");
        assert_eq!(json["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn history_maps_in_order_with_system_as_user() {
        let history = vec![
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];
        let request = build_request("claude-3-5-sonnet-20241022", 1024, &history, &[], false);

        let roles: Vec<_> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["user", "user", "assistant"]);
        assert_eq!(request.messages[0].content, "be brief");
    }

    #[test]
    fn response_deserializes_text_and_tool_use_blocks() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "stop_reason": "tool_use",
            "content": [
                { "type": "text", "text": "checking" },
                { "type": "tool_use", "id": "toolu_1", "name": "search",
                  "input": { "q": "x" } }
            ]
        });

        let response: ClaudeResponse = serde_json::from_value(body).unwrap();
        let domain: CompletionResponse = response.into();

        assert_eq!(domain.first_text(), Some("checking"));
        assert_eq!(domain.stop_reason, Some(StopReason::ToolUse));
        let invocations = domain.tool_invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].tool_name, "search");
        assert_eq!(invocations[0].arguments["q"], json!("x"));
    }

    #[test]
    fn unknown_content_blocks_are_skipped() {
        let body = json!({
            "id": "msg_2",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": "answer" }
            ]
        });

        let response: ClaudeResponse = serde_json::from_value(body).unwrap();
        let domain: CompletionResponse = response.into();
        assert_eq!(domain.content.len(), 1);
        assert_eq!(domain.first_text(), Some("answer"));
        assert_eq!(domain.stop_reason, None);
    }

    #[test]
    fn stop_reason_mapping_keeps_unknown_values() {
        assert_eq!(map_stop_reason("end_turn".to_string()), StopReason::EndTurn);
        assert_eq!(
            map_stop_reason("stop_sequence".to_string()),
            StopReason::Other("stop_sequence".to_string())
        );
    }
}
