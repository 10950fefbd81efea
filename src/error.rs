//! Error kinds for the chat core.
//!
//! The agent loop, model backend and tool registry report failures through
//! [`ChatError`]. The CLI layer wraps these in `anyhow` with context.

use thiserror::Error;

/// Everything that can abort a chat turn or a tool registration.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model asked for a tool that is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with this name is already registered.
    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),

    /// The tool name cannot be sent to the backend.
    #[error("invalid tool name `{0}`: use 1-64 ASCII letters, digits, `_` or `-`")]
    InvalidToolName(String),

    /// The model kept requesting tools past the configured limit.
    #[error("model requested tools for more than {0} consecutive rounds")]
    TooManyRounds(usize),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The event stream broke mid-response.
    #[error("stream error: {0}")]
    Stream(String),

    /// The backend sent an error payload inside the stream.
    #[error("backend error: {0}")]
    Api(String),

    /// A streamed chunk was not valid JSON of the expected shape.
    #[error("malformed stream chunk: {0}")]
    Decode(#[from] serde_json::Error),
}
