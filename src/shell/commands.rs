//! Input parsing: chat text versus slash commands.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    History,
    Transcript,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
/history     list the questions asked so far
/transcript  show the conversation
/help        show this help
/quit        end the session";

/// A leading `/` only makes a command when a single bare word follows it,
/// so pasted paths such as `/usr/bin/python3 not found?` stay chat.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix('/') else {
        return Input::Chat(line.to_string());
    };

    let name = name.to_ascii_lowercase();
    let command = match name.as_str() {
        "history" => Command::History,
        "transcript" => Command::Transcript,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other if is_command_word(other) => Command::Unknown(other.to_string()),
        _ => return Input::Chat(line.to_string()),
    };
    Input::Command(command)
}

fn is_command_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
