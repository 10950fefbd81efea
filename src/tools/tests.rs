use super::*;
use regex::Regex;
use serde_json::json;

struct EchoTool(&'static str);

#[async_trait::async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Echo the input back"
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        if input.get("fail").is_some() {
            anyhow::bail!("asked to fail");
        }
        Ok(ToolResult::success(input.to_string()))
    }
}

#[tokio::test]
async fn test_registry_with_builtins() {
    let registry = ToolRegistry::with_builtins().unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!registry.is_empty());
    let defs = registry.definitions();
    assert_eq!(defs[0].name, "get_current_time");
    assert_eq!(
        defs[0].parameters["required"],
        json!(["timezone", "location"])
    );
}

#[test]
fn test_register_rejects_duplicate_name() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool("echo"))).unwrap();
    let err = registry.register(Box::new(EchoTool("echo"))).unwrap_err();
    assert!(matches!(err, ChatError::DuplicateTool(name) if name == "echo"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_rejects_invalid_names() {
    let mut registry = ToolRegistry::new();
    for name in ["", "has space", "dotted.name"] {
        let err = registry.register(Box::new(EchoTool(name))).unwrap_err();
        assert!(matches!(err, ChatError::InvalidToolName(_)));
    }
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_current_time_valid_zone() {
    let registry = ToolRegistry::with_builtins().unwrap();
    let result = registry
        .execute(
            "get_current_time",
            json!({"timezone": "Asia/Seoul", "location": "Seoul"}),
        )
        .await
        .unwrap();
    assert!(!result.is_error);
    let pattern =
        Regex::new(r"^Asia/Seoul \(Seoul\) current time \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$")
            .unwrap();
    assert!(pattern.is_match(&result.content), "{}", result.content);
}

#[test]
fn test_current_time_unknown_zone_is_text() {
    let result = time_tool::current_time("Not/AZone", "X");
    assert!(result.is_error);
    assert!(result.content.contains("Not/AZone"));
    assert!(result.content.contains("Unknown timezone"));
}

#[test]
fn test_current_time_location_is_not_validated() {
    let result = time_tool::current_time("UTC", "Somewhere on the Moon");
    assert!(!result.is_error);
    assert!(result.content.starts_with("UTC (Somewhere on the Moon) current time "));
}

#[tokio::test]
async fn test_current_time_missing_argument_becomes_error_text() {
    let registry = ToolRegistry::with_builtins().unwrap();
    let result = registry
        .execute("get_current_time", json!({"timezone": "UTC"}))
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.starts_with("Error: "));
    assert!(result.content.contains("location"));
}

#[tokio::test]
async fn test_unknown_tool() {
    let registry = ToolRegistry::with_builtins().unwrap();
    let result = registry.execute("nonexistent_tool", json!({})).await;
    assert!(matches!(result, Err(ChatError::UnknownTool(name)) if name == "nonexistent_tool"));
}

#[tokio::test]
async fn test_invoke_returns_content_for_failed_tool() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool("echo"))).unwrap();
    let call = ToolCall {
        id: "call_0".into(),
        name: "echo".into(),
        arguments: json!({"fail": true}),
    };
    let output = registry.invoke(&call).await.unwrap();
    assert_eq!(output, "Error: asked to fail");
}
