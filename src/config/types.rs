//! Struct definitions and defaults for jikan configuration.

use serde::{Deserialize, Serialize};

/// Effective configuration for jikan, after layering files over defaults.
///
/// jikan runs with sensible defaults when no config file exists. Only the
/// API key is required, and it normally comes from the environment.
#[derive(Debug, Serialize, Clone)]
pub struct Config {
    /// Model identifier (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Base URL of the chat-completions API. `None` uses the OpenAI default.
    pub base_url: Option<String>,
    /// API key. The `OPENAI_API_KEY` environment variable wins over this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// System prompt that opens every session.
    pub system_prompt: String,
    /// Assistant greeting shown after the system prompt.
    pub greeting: String,
    /// Limit on consecutive tool-call rounds per turn.
    pub max_tool_rounds: Option<usize>,
}

/// One config file as written, `config.toml` or `jikan.toml`.
///
/// Every key is optional so a layer that sets a value can be told apart from
/// one that leaves it out, even when the value equals the default.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ConfigLayer {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub greeting: Option<String>,
    pub max_tool_rounds: Option<usize>,
}

impl ConfigLayer {
    /// Keys set in `self` win; the rest fall through to `base`.
    pub fn over(self, base: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            model: self.model.or(base.model),
            base_url: self.base_url.or(base.base_url),
            api_key: self.api_key.or(base.api_key),
            system_prompt: self.system_prompt.or(base.system_prompt),
            greeting: self.greeting.or(base.greeting),
            max_tool_rounds: self.max_tool_rounds.or(base.max_tool_rounds),
        }
    }
}

impl From<ConfigLayer> for Config {
    fn from(layer: ConfigLayer) -> Self {
        let defaults = Config::default();
        Self {
            model: layer.model.unwrap_or(defaults.model),
            base_url: layer.base_url,
            api_key: layer.api_key,
            system_prompt: layer.system_prompt.unwrap_or(defaults.system_prompt),
            greeting: layer.greeting.unwrap_or(defaults.greeting),
            max_tool_rounds: layer.max_tool_rounds,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: crate::constants::DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            system_prompt: crate::constants::DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: crate::constants::DEFAULT_GREETING.to_string(),
            max_tool_rounds: None,
        }
    }
}
