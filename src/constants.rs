//! Centralized constants for jikan.
//!
//! All default strings and configuration constants live here so they can be
//! changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "jikan";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the OpenAI-compatible chat-completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the backend API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "JIKAN_LOG";

/// Log filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// System prompt that opens every session.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI assistant that does its best to help the user.";

/// Assistant greeting shown at the start of every session.
pub const DEFAULT_GREETING: &str = "How can I help you?";

/// Maximum number of consecutive tool-call rounds in a single turn.
pub const MAX_TOOL_ROUNDS: usize = 8;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "jikan.toml";

// --- Tools ---

/// Timestamp layout returned by the time-lookup tool.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Longest tool name accepted by the registry (OpenAI function-name limit).
pub const TOOL_NAME_MAX_LEN: usize = 64;
