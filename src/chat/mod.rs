//! Interactive chat REPL for jikan.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support. Each user line becomes one turn: the full session history goes to
//! the [`Agent`], its fragments are rendered as they arrive, and the final
//! reply is appended to the session.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agent::Agent;
use crate::error::ChatError;
use crate::format;
use crate::message::{Message, Role};
use crate::output::{self, Renderer, StdoutRenderer};
use crate::session::Session;

/// Runs one conversation turn for `user_text`.
///
/// Appends the user message, streams the reply through `renderer`, and
/// appends the final assistant text. On failure the history keeps the user
/// message and every tool round the model already saw; only the unfinished
/// reply is dropped.
pub async fn run_turn(
    agent: &Agent,
    session: &mut Session,
    user_text: &str,
    renderer: &mut dyn Renderer,
) -> Result<String, ChatError> {
    session.append(Message::user(user_text));

    let reply = {
        let fragments = agent.respond(session.history_mut());
        output::write_stream(renderer, fragments).await?
    };

    session.append(Message::assistant(reply.clone()));
    Ok(reply)
}

/// Runs the interactive chat REPL.
///
/// Creates a fresh [`Session`], shows its opening messages, and enters a
/// readline loop until Ctrl+D, then tears the session down.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
pub async fn run_chat(agent: &Agent, mut session: Session, model: &str) -> Result<()> {
    println!(
        "{} [session: {}] [model: {}] (Ctrl+D to exit)",
        "jikan chat".bold().cyan(),
        session.short_id().yellow(),
        model.yellow(),
    );
    println!();
    for line in format::format_history(session.messages()) {
        println!("{}", line);
        println!();
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    if let commands::CommandAction::Unknown(cmd) =
                        commands::handle_slash_command(&line, &mut session)
                    {
                        println!("{} Unknown command: {}", "?".yellow(), cmd);
                    }
                    continue;
                }

                let _ = rl.add_history_entry(&line);
                println!();
                println!("{}", format::format_role_label(Role::Assistant));

                let mut renderer = StdoutRenderer::new();
                match run_turn(agent, &mut session, &line, &mut renderer).await {
                    Ok(_) => {
                        tracing::debug!(fragments = renderer.token_count(), "turn complete");
                    }
                    Err(e) => {
                        // Already shown by the renderer
                        tracing::warn!(error = %e, "turn aborted");
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    session.end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::scripted::{call_fragment, ScriptedBackend};
    use crate::provider::Fragment;
    use crate::tools::ToolRegistry;

    #[derive(Default)]
    struct Sink(String);

    impl Renderer for Sink {
        fn render_token(&mut self, token: &str) {
            self.0.push_str(token);
        }
        fn render_done(&mut self) {}
        fn render_error(&mut self, _err: &str) {}
    }

    fn agent_with(backend: &ScriptedBackend) -> Agent {
        Agent::new(
            Box::new(backend.clone()),
            ToolRegistry::with_builtins().unwrap(),
            crate::constants::MAX_TOOL_ROUNDS,
        )
    }

    #[tokio::test]
    async fn test_turn_appends_user_and_final_reply() {
        let backend = ScriptedBackend::new(vec![
            vec![call_fragment(
                0,
                "call_1",
                "get_current_time",
                r#"{"timezone":"Europe/Paris","location":"Paris"}"#,
            )],
            vec![Fragment::text("It is "), Fragment::text("morning in Paris.")],
        ]);
        let agent = agent_with(&backend);
        let mut session = Session::new("sys", "How can I help you?");
        let mut sink = Sink::default();

        let reply = run_turn(&agent, &mut session, "Time in Paris?", &mut sink)
            .await
            .unwrap();

        assert_eq!(reply, "It is morning in Paris.");
        assert_eq!(sink.0, reply);
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Assistant,
            ]
        );
        assert_eq!(session.messages().last().unwrap().text(), reply);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_committed_history() {
        let backend = ScriptedBackend::new(vec![
            vec![call_fragment(
                0,
                "call_1",
                "get_current_time",
                r#"{"timezone":"UTC","location":"London"}"#,
            )],
        ]);
        backend.push_failing_reply(vec![Fragment::text("It is")], "connection reset");
        let agent = agent_with(&backend);
        let mut session = Session::new("sys", "hi");
        let mut sink = Sink::default();

        let err = run_turn(&agent, &mut session, "Time in London?", &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Stream(_)));
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        // Everything the model was sent stays; the partial "It is" does not.
        assert_eq!(session.messages(), requests[1].as_slice());
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::Assistant, Role::User, Role::Assistant, Role::Tool]
        );
    }

    #[tokio::test]
    async fn test_next_turn_follows_failed_one() {
        let backend = ScriptedBackend::default();
        backend.push_failing_reply(vec![], "connection reset");
        let agent = agent_with(&backend);
        let mut session = Session::new("sys", "hi");
        let mut sink = Sink::default();

        run_turn(&agent, &mut session, "first", &mut sink)
            .await
            .unwrap_err();
        assert_eq!(session.messages().last().unwrap().text(), "first");
        assert_eq!(session.len(), 3);
    }
}
