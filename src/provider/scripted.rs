//! In-memory [`ChatBackend`] that replays scripted replies, for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::StreamExt;

use super::{ChatBackend, Fragment, FragmentStream, ToolCallDelta};
use crate::error::ChatError;
use crate::message::Message;
use crate::tools::ToolDefinition;

/// Plays back one scripted reply per request and records what it was sent.
///
/// Clones share their script and their request log, so a test can hand one
/// clone to an agent and inspect the other.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    replies: Arc<Mutex<VecDeque<Vec<Result<Fragment, String>>>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: Vec<Vec<Fragment>>) -> Self {
        let backend = Self::default();
        for reply in replies {
            backend
                .replies
                .lock()
                .unwrap()
                .push_back(reply.into_iter().map(Ok).collect());
        }
        backend
    }

    /// Queues a reply that breaks with a stream error after `before`.
    pub(crate) fn push_failing_reply(&self, before: Vec<Fragment>, error: &str) {
        let mut reply: Vec<Result<Fragment, String>> = before.into_iter().map(Ok).collect();
        reply.push(Err(error.to_string()));
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Histories received so far, one per request.
    pub(crate) fn requests(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedBackend {
    async fn stream_chat(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<FragmentStream, ChatError> {
        assert!(!tools.is_empty(), "tool schemas must accompany every request");
        self.seen.lock().unwrap().push(history.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ChatError::Stream("no scripted reply left".into()))?;
        let items: Vec<Result<Fragment, ChatError>> = reply
            .into_iter()
            .map(|item| item.map_err(ChatError::Stream))
            .collect();
        Ok(futures::stream::iter(items).boxed())
    }
}

/// A fragment opening tool call `index` with its id, name and first arguments.
pub(crate) fn call_fragment(index: usize, id: &str, name: &str, args: &str) -> Fragment {
    Fragment {
        text: None,
        tool_calls: vec![ToolCallDelta {
            index,
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            arguments: Some(args.to_string()),
        }],
    }
}

/// A fragment continuing the arguments of tool call `index`.
pub(crate) fn args_fragment(index: usize, args: &str) -> Fragment {
    Fragment {
        text: None,
        tool_calls: vec![ToolCallDelta {
            index,
            arguments: Some(args.to_string()),
            ..Default::default()
        }],
    }
}
