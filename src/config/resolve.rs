//! Environment variable substitution and effective-value resolution.

use super::types::Config;

use crate::constants::{API_KEY_ENV, DEFAULT_BASE_URL, MAX_TOOL_ROUNDS};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        self.system_prompt = Self::resolve_str(&self.system_prompt);
        self.greeting = Self::resolve_str(&self.greeting);
        if let Some(ref mut url) = self.base_url {
            *url = Self::resolve_str(url);
        }
        if let Some(ref mut key) = self.api_key {
            *key = Self::resolve_str(key);
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    ///
    /// Inserted values are never rescanned.
    fn resolve_str(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{env:") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let var_name = &rest[start + 5..start + len];
            result.push_str(&rest[..start]);
            result.push_str(&std::env::var(var_name).unwrap_or_default());
            rest = &rest[start + len + 1..];
        }
        result.push_str(rest);
        result
    }

    /// Resolve the API key: env var first, then config value.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(val) = std::env::var(API_KEY_ENV) {
            if !val.is_empty() {
                return Some(val);
            }
        }
        self.api_key.clone().filter(|key| !key.is_empty())
    }

    /// Base URL of the chat-completions API.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Limit on consecutive tool-call rounds per turn.
    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds.unwrap_or(MAX_TOOL_ROUNDS)
    }

    /// Copy of the config that is safe to print.
    pub fn redacted(&self) -> Config {
        let mut shown = self.clone();
        if shown.api_key.is_some() {
            shown.api_key = Some("<redacted>".to_string());
        }
        shown
    }
}
