//! Command-line interface definition and dispatch for jikan.
//!
//! Uses [`clap`] for argument parsing with derive macros. Running `jikan`
//! with no subcommand starts an interactive chat.

use crate::{
    agent::Agent, chat, config, error::ChatError, output, provider, session::Session,
    tools::ToolRegistry,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

/// Top-level CLI structure for jikan.
#[derive(Parser)]
#[command(name = "jikan", about = "A streaming LLM chat that knows what time it is")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Flags that pick the model backend.
#[derive(Args, Clone, Default)]
pub struct BackendArgs {
    /// Model to use (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

/// Available subcommands for the jikan CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective config (API key redacted)
    Show,
}

/// A failure the renderer has already shown to the user.
///
/// `main` exits non-zero on it without printing it again.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AlreadyReported(pub ChatError);

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = load_config(&cli.backend)?;
            let agent = build_agent(&config)?;
            let session = Session::new(&config.system_prompt, &config.greeting);
            chat::run_chat(&agent, session, &config.model).await
        }
        Commands::Ask { prompt } => {
            let prompt = prompt.join(" ");
            if prompt.is_empty() {
                anyhow::bail!("No prompt provided. Usage: jikan ask \"what time is it in Seoul?\"");
            }

            let config = load_config(&cli.backend)?;
            let agent = build_agent(&config)?;

            println!(
                "{} [model: {}]",
                "jikan".bold().cyan(),
                config.model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let mut session = Session::new(&config.system_prompt, &config.greeting);
            let mut renderer = output::StdoutRenderer::new();
            let result = chat::run_turn(&agent, &mut session, &prompt, &mut renderer).await;
            session.end();
            finish_ask(result)
        }
        Commands::Config { action } => {
            let config = load_config(&cli.backend)?;
            match action {
                ConfigAction::Show => {
                    let path = config::Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config.redacted())?;
                    println!("{}", toml_str);
                }
            }
            Ok(())
        }
    }
}

/// The streamed reply was printed already; a failure was too.
fn finish_ask(result: Result<String, ChatError>) -> Result<()> {
    result.map(drop).map_err(|e| AlreadyReported(e).into())
}

/// Loads the config files and applies CLI overrides on top.
fn load_config(args: &BackendArgs) -> Result<config::Config> {
    let mut config = config::Config::load()?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.base_url = Some(url.clone());
    }
    Ok(config)
}

/// Builds the agent: backend from config, built-in tools, round limit.
fn build_agent(config: &config::Config) -> Result<Agent> {
    let api_key = config.resolve_api_key().with_context(|| {
        format!(
            "No API key found. Set {} or configure api_key in config.toml",
            crate::constants::API_KEY_ENV
        )
    })?;
    let backend = provider::OpenAiBackend::new(config.base_url(), api_key, &config.model);
    tracing::info!(model = backend.model(), base_url = config.base_url(), "backend configured");
    let tools = ToolRegistry::with_builtins().context("Failed to register built-in tools")?;
    Ok(Agent::new(Box::new(backend), tools, config.max_tool_rounds()))
}
