//! In-memory chat session for jikan.
//!
//! A [`Session`] owns the conversation history for the lifetime of one
//! interactive chat. It is created when the chat starts, mutated only by the
//! active turn, and torn down with [`Session::end`]. Nothing is written to
//! disk.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::message::Message;

/// An active conversation.
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    system_prompt: String,
    greeting: String,
    messages: Vec<Message>,
}

impl Session {
    /// Starts a session whose history is the system prompt followed by the
    /// assistant greeting.
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        let greeting = greeting.into();
        let session = Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            messages: opening_messages(&system_prompt, &greeting),
            system_prompt,
            greeting,
        };
        tracing::info!(session = %session.id, "session started");
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Mutable history handed to the agent loop for one turn.
    pub fn history_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    pub fn append(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns the history to its opening two messages.
    pub fn reset(&mut self) {
        self.messages = opening_messages(&self.system_prompt, &self.greeting);
        tracing::info!(session = %self.id, "session history cleared");
    }

    /// Short form of the id for display.
    pub fn short_id(&self) -> &str {
        &self.id[..8.min(self.id.len())]
    }

    /// Tears the session down, discarding its history.
    pub fn end(self) {
        let elapsed = Utc::now() - self.created_at;
        tracing::info!(
            session = %self.id,
            messages = self.len(),
            seconds = elapsed.num_seconds(),
            "session ended"
        );
    }
}

fn opening_messages(system_prompt: &str, greeting: &str) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::assistant(greeting)]
}
