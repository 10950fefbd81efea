//! OpenAI chat-completions wire format.
//!
//! Builds request bodies from jikan [`Message`]s and decodes streamed
//! `chat.completion.chunk` payloads into [`Fragment`]s.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Fragment, ToolCallDelta};
use crate::error::ChatError;
use crate::message::{Message, Role};
use crate::tools::ToolDefinition;

/// Sentinel data line that closes an OpenAI event stream.
pub(super) const DONE_MARKER: &str = "[DONE]";

/// Builds the JSON body for a streaming completion request.
pub(super) fn request_body(model: &str, history: &[Message], tools: &[ToolDefinition]) -> Value {
    let mut body = json!({
        "model": model,
        "stream": true,
        "messages": history.iter().map(to_wire_message).collect::<Vec<_>>(),
    });
    if !tools.is_empty() {
        body["tools"] = tools.iter().map(to_wire_tool).collect();
    }
    body
}

/// Converts a jikan [`Message`] to an OpenAI chat message.
///
/// - **Assistant** (with tool calls) → `tool_calls` with string-encoded arguments
/// - **Tool** → `tool_call_id` plus text content
/// - everything else → role and text content
pub(super) fn to_wire_message(msg: &Message) -> Value {
    match msg.role {
        Role::Assistant if !msg.tool_calls.is_empty() => {
            let calls: Vec<Value> = msg
                .tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments.to_string(),
                        }
                    })
                })
                .collect();
            json!({
                "role": "assistant",
                "content": msg.content,
                "tool_calls": calls,
            })
        }
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": msg.tool_call_id.as_deref().unwrap_or_default(),
            "content": msg.text(),
        }),
        role => json!({
            "role": role_name(role),
            "content": msg.text(),
        }),
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn to_wire_tool(def: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": def.name,
            "description": def.description,
            "parameters": def.parameters,
        }
    })
}

#[derive(Debug, Deserialize)]
struct Chunk {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallChunk>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallChunk {
    index: usize,
    id: Option<String>,
    function: Option<FunctionChunk>,
}

#[derive(Debug, Deserialize)]
struct FunctionChunk {
    name: Option<String>,
    arguments: Option<String>,
}

/// Decodes one SSE data payload.
///
/// Returns `Ok(None)` for chunks that carry nothing for the reply, such as
/// the trailing usage chunk with empty `choices`.
pub(super) fn parse_chunk(data: &str) -> Result<Option<Fragment>, ChatError> {
    let value: Value = serde_json::from_str(data)?;
    if let Some(message) = api_error_message(&value) {
        return Err(ChatError::Api(message));
    }

    let chunk: Chunk = serde_json::from_value(value)?;
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    let fragment = Fragment {
        text: choice.delta.content,
        tool_calls: choice
            .delta
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                let (name, arguments) = match tc.function {
                    Some(f) => (f.name, f.arguments),
                    None => (None, None),
                };
                ToolCallDelta {
                    index: tc.index,
                    id: tc.id,
                    name,
                    arguments,
                }
            })
            .collect(),
    };
    Ok((!fragment.is_empty()).then_some(fragment))
}

fn api_error_message(value: &Value) -> Option<String> {
    let error = value.get("error").filter(|e| !e.is_null())?;
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }
    Some(error.to_string())
}
