//! Folds streamed [`Fragment`]s into one assistant [`Message`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::message::{Message, ToolCall};
use crate::provider::Fragment;

#[derive(Debug, Default)]
struct PartialCall {
    id: String,
    name: String,
    arguments: String,
}

/// The in-progress assistant message of one streaming pass.
///
/// Text is concatenated in arrival order. Tool-call deltas are grouped by
/// their index: `id` and `name` are taken from the first delta carrying
/// them, `arguments` pieces are concatenated.
#[derive(Debug, Default)]
pub struct MessageAccumulator {
    text: String,
    calls: BTreeMap<usize, PartialCall>,
}

impl MessageAccumulator {
    pub fn merge(&mut self, fragment: &Fragment) {
        if let Some(text) = &fragment.text {
            self.text.push_str(text);
        }
        for delta in &fragment.tool_calls {
            let call = self.calls.entry(delta.index).or_default();
            if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
                if call.id.is_empty() {
                    call.id = id.to_string();
                }
            }
            if let Some(name) = delta.name.as_deref().filter(|name| !name.is_empty()) {
                if call.name.is_empty() {
                    call.name = name.to_string();
                }
            }
            if let Some(arguments) = &delta.arguments {
                call.arguments.push_str(arguments);
            }
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Produces the finished assistant message.
    ///
    /// Calls that never received a name are dropped. Calls without an id get
    /// `call_<index>`. Arguments that are not valid JSON are handed to the
    /// tool as a JSON string so its own decoding reports the problem.
    pub fn finish(self) -> Message {
        let tool_calls: Vec<ToolCall> = self
            .calls
            .into_iter()
            .filter_map(|(index, call)| {
                if call.name.is_empty() {
                    tracing::warn!(index, "dropping streamed tool call without a name");
                    return None;
                }
                Some(ToolCall {
                    id: if call.id.is_empty() {
                        format!("call_{index}")
                    } else {
                        call.id
                    },
                    name: call.name,
                    arguments: parse_arguments(call.arguments),
                })
            })
            .collect();

        if tool_calls.is_empty() {
            Message::assistant(self.text)
        } else {
            Message::assistant_with_tools(self.text, tool_calls)
        }
    }
}

fn parse_arguments(raw: String) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}
