//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/history`, `/clear`, and `/help`. Returns a [`CommandAction`]
//! so the REPL loop can decide how to proceed.

use colored::Colorize;

use crate::format;
use crate::session::Session;

/// Action returned by slash command handling.
#[derive(Debug, PartialEq)]
pub(crate) enum CommandAction {
    /// Command was handled successfully; continue the REPL loop.
    Continue,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command.
pub(crate) fn handle_slash_command(command: &str, session: &mut Session) -> CommandAction {
    match command {
        "/history" => {
            for line in format::format_history(session.messages()) {
                println!("{}", line);
                println!();
            }
            CommandAction::Continue
        }
        "/clear" => {
            session.reset();
            println!("{}", "History cleared.".dimmed());
            CommandAction::Continue
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - start the conversation over", "/clear".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit", "Ctrl+D".cyan());
            CommandAction::Continue
        }
        _ => CommandAction::Unknown(command.to_string()),
    }
}
