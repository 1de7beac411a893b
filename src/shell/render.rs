//! Plain-text rendering of the chat transcript.

use crate::config::UiConfig;
use crate::session::{Role, Turn};
use std::io::{self, Write};

pub const BUSY: &str = "Generating response...";

pub fn header<W: Write>(out: &mut W, ui: &UiConfig) -> io::Result<()> {
    writeln!(out, "{}", ui.title)?;
    writeln!(out, "{}", ui.subtitle)?;
    writeln!(out)
}

pub fn turn<W: Write>(out: &mut W, turn: &Turn) -> io::Result<()> {
    match turn.role() {
        Role::User => writeln!(out, "you: {}", turn.content()),
        Role::Assistant => writeln!(out, "🤖 chatbot: {}", turn.content()),
    }
}

pub fn turns<W: Write>(out: &mut W, turns: &[Turn]) -> io::Result<()> {
    turns.iter().try_for_each(|t| turn(out, t))
}

/// The question-history sidebar.
pub fn sidebar<'a, W, I>(out: &mut W, title: &str, questions: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    writeln!(out, "{title} 📖")?;
    writeln!(out, "---")?;
    let mut empty = true;
    for (i, question) in questions.into_iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, question)?;
        empty = false;
    }
    if empty {
        writeln!(out, "(no questions yet)")?;
    }
    Ok(())
}

pub fn busy<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{BUSY}")?;
    out.flush()
}
