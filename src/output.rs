//! Output rendering abstraction for jikan.
//!
//! Defines the [`Renderer`] trait that decouples streamed LLM output from the
//! display layer, and [`write_stream`], which drives a fragment stream into a
//! renderer and returns the full reply.

use colored::Colorize;
use futures::{Stream, StreamExt};
use std::io::{self, Write};

use crate::error::ChatError;

/// Trait for rendering LLM output.
pub trait Renderer {
    /// Render a single token as it arrives.
    fn render_token(&mut self, token: &str);

    /// Called when the full response is complete.
    fn render_done(&mut self);

    /// Called when an error occurs during streaming.
    fn render_error(&mut self, err: &str);
}

/// Renders streaming LLM output directly to stdout.
///
/// Each token is printed immediately with an explicit flush so the user
/// sees a "typing" effect. Tracks the total number of tokens received.
pub struct StdoutRenderer {
    token_count: usize,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self { token_count: 0 }
    }

    /// Returns the total number of tokens rendered.
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

impl Default for StdoutRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for StdoutRenderer {
    fn render_token(&mut self, token: &str) {
        print!("{}", token);
        // Flush immediately so each token appears as it arrives
        io::stdout().flush().ok();
        self.token_count += 1;
    }

    fn render_done(&mut self) {
        println!();
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}

/// Displays a fragment stream incrementally and returns the concatenated text.
///
/// Pulls one fragment at a time, so production upstream only advances as
/// fast as the display consumes. On the first error the renderer is told,
/// the partial text is discarded and the error is returned.
pub async fn write_stream<S>(renderer: &mut dyn Renderer, mut fragments: S) -> Result<String, ChatError>
where
    S: Stream<Item = Result<String, ChatError>> + Unpin,
{
    let mut full_response = String::new();
    while let Some(fragment) = fragments.next().await {
        match fragment {
            Ok(text) => {
                renderer.render_token(&text);
                full_response.push_str(&text);
            }
            Err(err) => {
                renderer.render_error(&err.to_string());
                return Err(err);
            }
        }
    }
    renderer.render_done();
    Ok(full_response)
}
