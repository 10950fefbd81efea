//! Streaming response loop with tool dispatch.
//!
//! [`Agent::respond`] turns a conversation history into a pull-driven stream
//! of text fragments. Each streaming pass is folded into an assistant message
//! by [`MessageAccumulator`]; when that message requests tools, the calls are
//! queued, executed in order, their results appended to the history, and a
//! follow-up pass is opened. The stream ends after a pass with no tool calls.

mod accumulator;

use std::collections::VecDeque;

use futures::stream::{self, LocalBoxStream};
use futures::StreamExt;

use crate::error::ChatError;
use crate::message::{Message, ToolCall};
use crate::provider::{ChatBackend, FragmentStream};
use crate::tools::{ToolDefinition, ToolRegistry};

use accumulator::MessageAccumulator;

/// Drives one model backend with one tool set.
pub struct Agent {
    backend: Box<dyn ChatBackend>,
    tools: ToolRegistry,
    definitions: Vec<ToolDefinition>,
    max_tool_rounds: usize,
}

impl Agent {
    pub fn new(backend: Box<dyn ChatBackend>, tools: ToolRegistry, max_tool_rounds: usize) -> Self {
        let definitions = tools.definitions();
        tracing::debug!(tools = tools.len(), max_tool_rounds, "agent ready");
        Self {
            backend,
            tools,
            definitions,
            max_tool_rounds,
        }
    }

    /// Streams the reply to `history`, resolving tool calls along the way.
    ///
    /// Yields text fragments in receipt order. Assistant tool-call messages
    /// and their tool results are appended to `history` once the pass that
    /// produced them has fully arrived; the final text-only reply is *not*
    /// appended, the caller owns that step.
    ///
    /// An error item ends the stream. An unknown tool name aborts before
    /// anything from that pass is committed.
    pub fn respond<'a>(
        &'a self,
        history: &'a mut Vec<Message>,
    ) -> LocalBoxStream<'a, Result<String, ChatError>> {
        let turn = Turn {
            agent: self,
            history,
            phase: Phase::Request,
            accumulator: MessageAccumulator::default(),
            tool_rounds: 0,
        };
        stream::unfold(turn, |mut turn| async move {
            let item = turn.advance().await?;
            Some((item, turn))
        })
        .boxed_local()
    }
}

enum Phase {
    /// Open a new streaming request over the current history.
    Request,
    /// Pull fragments from the open stream.
    Receive(FragmentStream),
    /// Execute queued tool calls one at a time.
    Dispatch(VecDeque<ToolCall>),
    Finished,
}

struct Turn<'a> {
    agent: &'a Agent,
    history: &'a mut Vec<Message>,
    phase: Phase,
    accumulator: MessageAccumulator,
    tool_rounds: usize,
}

impl Turn<'_> {
    /// Runs the state machine until it has a fragment to hand out or is done.
    async fn advance(&mut self) -> Option<Result<String, ChatError>> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Request => {
                    match self
                        .agent
                        .backend
                        .stream_chat(self.history.as_slice(), &self.agent.definitions)
                        .await
                    {
                        Ok(stream) => self.phase = Phase::Receive(stream),
                        Err(e) => return Some(Err(e)),
                    }
                }
                Phase::Receive(mut stream) => match stream.next().await {
                    Some(Ok(fragment)) => {
                        self.accumulator.merge(&fragment);
                        self.phase = Phase::Receive(stream);
                        if let Some(text) = fragment.text.filter(|t| !t.is_empty()) {
                            return Some(Ok(text));
                        }
                    }
                    Some(Err(e)) => return Some(Err(e)),
                    None => {
                        let message = std::mem::take(&mut self.accumulator).finish();
                        if message.tool_calls.is_empty() {
                            return None;
                        }
                        match self.commit_tool_request(message) {
                            Ok(queue) => self.phase = Phase::Dispatch(queue),
                            Err(e) => return Some(Err(e)),
                        }
                    }
                },
                Phase::Dispatch(mut queue) => match queue.pop_front() {
                    Some(call) => {
                        tracing::info!(tool = %call.name, id = %call.id, arguments = %call.arguments, "invoking tool");
                        match self.agent.tools.invoke(&call).await {
                            Ok(output) => {
                                self.history.push(Message::tool_result(call.id, output));
                                self.phase = Phase::Dispatch(queue);
                            }
                            Err(e) => return Some(Err(e)),
                        }
                    }
                    None => self.phase = Phase::Request,
                },
                Phase::Finished => return None,
            }
        }
    }

    /// Appends the assistant tool-call message and returns the calls to run.
    ///
    /// Every requested name is checked first so a bad request leaves the
    /// history untouched.
    fn commit_tool_request(&mut self, message: Message) -> Result<VecDeque<ToolCall>, ChatError> {
        if let Some(unknown) = message
            .tool_calls
            .iter()
            .find(|call| !self.agent.tools.contains(&call.name))
        {
            tracing::error!(tool = %unknown.name, "model requested an unregistered tool");
            return Err(ChatError::UnknownTool(unknown.name.clone()));
        }

        self.tool_rounds += 1;
        if self.tool_rounds > self.agent.max_tool_rounds {
            return Err(ChatError::TooManyRounds(self.agent.max_tool_rounds));
        }
        tracing::debug!(
            round = self.tool_rounds,
            calls = message.tool_calls.len(),
            "model requested tools"
        );

        let queue = message.tool_calls.iter().cloned().collect();
        self.history.push(message);
        Ok(queue)
    }
}
