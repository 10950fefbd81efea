use colored::Colorize;

use crate::message::{Message, Role};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let label = format_role_label(msg.role);
    let body = format_body(msg.text(), msg.role);
    format!("{}\n{}", label, body)
}

/// Each role gets its own lane so tool output never reads as the assistant.
pub fn format_role_label(role: Role) -> String {
    let label = format!("{}:", role);
    match role {
        Role::User => format!("{}", label.green().bold()),
        Role::Assistant => format!("{}", label.cyan().bold()),
        Role::System => format!("{}", label.dimmed()),
        Role::Tool => format!("{}", label.yellow()),
    }
}

fn format_body(text: &str, role: Role) -> String {
    match role {
        Role::User | Role::Assistant => text.to_string(),
        Role::System | Role::Tool => text.dimmed().to_string(),
    }
}

/// Formats every message that has text, in history order.
///
/// Assistant turns that only carried tool calls have no text and are skipped.
pub fn format_history(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter(|m| !m.text().is_empty())
        .map(format_message)
        .collect()
}
