pub mod time_tool;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::constants::TOOL_NAME_MAX_LEN;
use crate::error::ChatError;
use crate::message::ToolCall;
use time_tool::CurrentTimeTool;

/// The result of executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description sent with the tool schema.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value) -> Result<ToolResult>;
}

/// Holds all registered tools and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    ///
    /// Rejects names the backend would refuse and names already taken, so a
    /// bad registration fails at startup instead of mid-conversation.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ChatError> {
        let name = tool.name();
        if !is_valid_tool_name(name) {
            return Err(ChatError::InvalidToolName(name.to_string()));
        }
        if self.contains(name) {
            return Err(ChatError::DuplicateTool(name.to_string()));
        }
        self.tools.push(Arc::from(tool));
        Ok(())
    }

    /// Produce definitions for the LLM (sent in the API request).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Look up a tool by name and execute it.
    pub async fn execute(&self, name: &str, input: Value) -> Result<ToolResult, ChatError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ChatError::UnknownTool(name.to_string()))?;
        match tool.execute(input).await {
            Ok(result) => Ok(result),
            // The model sees the failure as text and can react to it.
            Err(e) => Ok(ToolResult::error(format!("Error: {}", e))),
        }
    }

    /// Runs a model-requested call and returns the text fed back to the model.
    pub async fn invoke(&self, call: &ToolCall) -> Result<String, ChatError> {
        let result = self.execute(&call.name, call.arguments.clone()).await?;
        if result.is_error {
            tracing::warn!(tool = %call.name, id = %call.id, output = %result.content, "tool reported an error");
        } else {
            tracing::info!(tool = %call.name, id = %call.id, output = %result.content, "tool finished");
        }
        Ok(result.content)
    }

    /// How many tools are registered.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    pub fn with_builtins() -> Result<Self, ChatError> {
        let mut registry = Self::new();
        registry.register(Box::new(CurrentTimeTool))?;
        Ok(registry)
    }
}

fn is_valid_tool_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= TOOL_NAME_MAX_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests;
