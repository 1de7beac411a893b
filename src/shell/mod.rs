//! Line-oriented terminal front-end for a single chat session.

pub mod commands;
pub mod render;

pub use commands::{parse_input, Command, Input};

use crate::config::UiConfig;
use crate::engine::Orchestrator;
use crate::preprocessing::{Cleaner, EMPTY_INPUT_GUIDANCE};
use crate::session::Session;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

pub struct Shell {
    orchestrator: Orchestrator,
    session: Session,
    ui: UiConfig,
}

impl Shell {
    pub fn new(orchestrator: Orchestrator, session: Session, ui: UiConfig) -> Self {
        Self {
            orchestrator,
            session,
            ui,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads submissions until `/quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        info!(session = %self.session.id(), "Session started");
        render::header(out, &self.ui)?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_input(&line) {
                Input::Command(Command::Quit) => break,
                Input::Command(command) => self.command(command, out)?,
                Input::Chat(text) => self.chat(&text, out).await?,
            }
        }

        info!(
            session = %self.session.id(),
            turns = self.session.history().len(),
            "Session ended"
        );
        Ok(())
    }

    /// Runs one submission and redraws the visible transcript.
    async fn chat<W: Write>(&mut self, text: &str, out: &mut W) -> anyhow::Result<()> {
        let Ok(input) = Cleaner::validate(text) else {
            writeln!(out, "{EMPTY_INPUT_GUIDANCE}")?;
            return Ok(());
        };

        render::busy(out)?;
        let result = self.orchestrator.record_turn(&mut self.session, input).await;
        debug!(error = result.is_error(), "Turn complete");

        render::turns(out, self.session.visible())?;
        Ok(())
    }

    fn command<W: Write>(&self, command: Command, out: &mut W) -> anyhow::Result<()> {
        match command {
            Command::History => {
                render::sidebar(out, &self.ui.sidebar_title, self.session.history().questions())?
            }
            Command::Transcript => render::turns(out, self.session.visible())?,
            Command::Help => writeln!(out, "{}", commands::HELP)?,
            Command::Unknown(name) => {
                writeln!(out, "Unknown command `/{name}`. Type /help for commands.")?
            }
            Command::Quit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
