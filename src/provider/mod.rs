//! LLM backend abstraction for jikan.
//!
//! [`ChatBackend`] is the seam between the agent loop and the network: it
//! turns a history plus tool schemas into a stream of [`Fragment`]s.
//! [`OpenAiBackend`] speaks the OpenAI chat-completions streaming protocol.

mod client;
#[cfg(test)]
pub(crate) mod scripted;
mod wire;

pub use client::OpenAiBackend;

use futures::stream::BoxStream;

use crate::error::ChatError;
use crate::message::Message;
use crate::tools::ToolDefinition;

/// A partial tool call as it arrives on the wire.
///
/// Deltas for the same call share an `index`; `id` and `name` usually come
/// only in the first delta while `arguments` arrives in pieces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallDelta {
    pub index: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// One streamed piece of an assistant reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCallDelta>,
}

impl Fragment {
    #[cfg(test)]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty) && self.tool_calls.is_empty()
    }
}

/// Stream of fragments for one reply. Owns its data so the history can be
/// mutated once the stream is exhausted.
pub type FragmentStream = BoxStream<'static, Result<Fragment, ChatError>>;

/// A language-model backend that streams chat completions.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Opens a streaming completion over the full `history`, advertising `tools`.
    async fn stream_chat(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<FragmentStream, ChatError>;
}
