//! HTTP client for OpenAI-compatible streaming chat completions.
//!
//! Contains the [`OpenAiBackend`] struct which posts the conversation to
//! `{base_url}/chat/completions` with `stream: true` and decodes the
//! server-sent event response into [`Fragment`]s.

use eventsource_stream::Eventsource;
use futures::{future, StreamExt};

use super::wire::{self, DONE_MARKER};
use super::{ChatBackend, FragmentStream};
use crate::error::ChatError;
use crate::message::Message;
use crate::tools::ToolDefinition;

/// A configured chat-completions endpoint ready to stream replies.
pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiBackend {
    async fn stream_chat(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<FragmentStream, ChatError> {
        let body = wire::request_body(&self.model, history, tools);
        tracing::debug!(
            model = %self.model,
            messages = history.len(),
            tools = tools.len(),
            "opening completion stream"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let fragments = response
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                future::ready(!matches!(event, Ok(event) if event.data == DONE_MARKER))
            })
            .filter_map(|event| {
                future::ready(match event {
                    Ok(event) => {
                        tracing::trace!(data = %event.data, "sse event");
                        wire::parse_chunk(&event.data).transpose()
                    }
                    Err(err) => Some(Err(ChatError::Stream(err.to_string()))),
                })
            });

        Ok(fragments.boxed())
    }
}
