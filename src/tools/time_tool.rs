use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolResult};
use crate::constants::TIME_FORMAT;

/// Reports the current wall-clock time in an IANA timezone.
pub struct CurrentTimeTool;

#[derive(Deserialize)]
struct CurrentTimeInput {
    timezone: String,
    location: String,
}

/// Looks up the current time in `timezone`.
///
/// `location` is a free-text label echoed back so the model can tell apart
/// places that share a zone. It is never checked against `timezone`.
pub fn current_time(timezone: &str, location: &str) -> ToolResult {
    match timezone.parse::<Tz>() {
        Ok(tz) => {
            let now = Utc::now().with_timezone(&tz).format(TIME_FORMAT);
            ToolResult::success(format!("{timezone} ({location}) current time {now}"))
        }
        Err(_) => ToolResult::error(format!("Unknown timezone: {timezone}")),
    }
}

#[async_trait::async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Return the current time in a timezone. The timezone must be a real IANA \
identifier such as 'Asia/Seoul'. The location is the place the user asked about; \
timezones do not cover every place name, so it is echoed back for the answer."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "IANA timezone identifier, e.g. 'Asia/Seoul'. Must exist."
                },
                "location": {
                    "type": "string",
                    "description": "Name of the place the user asked about"
                }
            },
            "required": ["timezone", "location"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: CurrentTimeInput = serde_json::from_value(input)?;
        Ok(current_time(&input.timezone, &input.location))
    }
}
