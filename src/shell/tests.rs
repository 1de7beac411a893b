//! Shell tests driven by scripted stdin.

use super::*;
use crate::llama::testing::{EchoClient, FailingClient};
use crate::llama::{GenerationClient, GenerationOptions};
use crate::preprocessing::{PromptFormatter, EMPTY_INPUT_GUIDANCE};
use crate::session::HistoryRetention;
use std::sync::Arc;

fn shell(client: Arc<dyn GenerationClient>, retention: HistoryRetention) -> Shell {
    let orchestrator =
        Orchestrator::new(client, PromptFormatter::default(), GenerationOptions::default());
    Shell::new(orchestrator, Session::new(retention), UiConfig::default())
}

async fn drive(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    shell.run(script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn parses_commands_and_chat() {
    assert_eq!(parse_input("/history"), Input::Command(Command::History));
    assert_eq!(parse_input("  /EXIT "), Input::Command(Command::Quit));
    assert_eq!(
        parse_input("/nope"),
        Input::Command(Command::Unknown("nope".to_string()))
    );
    assert_eq!(
        parse_input("what is 2/3?"),
        Input::Chat("what is 2/3?".to_string())
    );
}

#[test]
fn slash_paths_are_chat() {
    assert_eq!(
        parse_input("/usr/bin/python3 not found?"),
        Input::Chat("/usr/bin/python3 not found?".to_string())
    );
    assert_eq!(
        parse_input("/help me with lists"),
        Input::Chat("/help me with lists".to_string())
    );
    assert_eq!(parse_input("/"), Input::Chat("/".to_string()));
}

#[tokio::test]
async fn pasted_path_goes_to_the_model() {
    let mut shell = shell(Arc::new(EchoClient::new("check PATH")), HistoryRetention::All);
    let output = drive(&mut shell, "/usr/bin/python3 not found?\n").await;

    assert!(!output.contains("Unknown command"));
    assert!(output.contains("you: /usr/bin/python3 not found?"));
    assert_eq!(shell.session().history().len(), 2);
}

#[tokio::test]
async fn chat_round_trip_renders_both_turns() {
    let mut shell = shell(Arc::new(EchoClient::new("use reversed()")), HistoryRetention::All);
    let output = drive(&mut shell, "how to reverse a list\n/quit\nignored\n").await;

    assert!(output.starts_with(&UiConfig::default().title));
    assert!(output.contains(render::BUSY));
    assert!(output.contains("you: how to reverse a list"));
    assert!(output.contains("🤖 chatbot: use reversed()"));
    assert_eq!(shell.session().history().len(), 2);
}

#[tokio::test]
async fn each_turn_redraws_visible_history() {
    let mut shell = shell(Arc::new(EchoClient::new("ok")), HistoryRetention::All);
    let output = drive(&mut shell, "first\nsecond\n").await;

    assert_eq!(output.matches("you: first").count(), 2);
    assert_eq!(output.matches("you: second").count(), 1);
}

#[tokio::test]
async fn latest_retention_redraws_only_newest_exchange() {
    let mut shell = shell(Arc::new(EchoClient::new("ok")), HistoryRetention::Latest);
    let output = drive(&mut shell, "first\nsecond\n").await;

    assert_eq!(output.matches("you: first").count(), 1);
    assert_eq!(output.matches("you: second").count(), 1);
}

#[tokio::test]
async fn blank_line_prints_guidance_only() {
    let mut shell = shell(Arc::new(EchoClient::new("x")), HistoryRetention::All);
    let output = drive(&mut shell, "   \n").await;

    assert!(output.contains(EMPTY_INPUT_GUIDANCE));
    assert!(!output.contains(render::BUSY));
    assert!(shell.session().history().is_empty());
}

#[tokio::test]
async fn history_command_lists_questions() {
    let mut shell = shell(Arc::new(EchoClient::new("ok")), HistoryRetention::All);
    let output = drive(&mut shell, "first question\nsecond question\n/history\n").await;

    assert!(output.contains("Question history 📖"));
    assert!(output.contains("1. first question"));
    assert!(output.contains("2. second question"));
}

#[tokio::test]
async fn transcript_respects_latest_retention() {
    let mut shell = shell(Arc::new(EchoClient::new("ok")), HistoryRetention::Latest);
    drive(&mut shell, "old\nnew\n").await;

    let mut out = Vec::new();
    render::turns(&mut out, shell.session().visible()).unwrap();
    let transcript = String::from_utf8(out).unwrap();
    assert!(!transcript.contains("you: old"));
    assert!(transcript.contains("you: new"));
    assert_eq!(shell.session().history().len(), 4);
}

#[tokio::test]
async fn generation_failure_keeps_session_alive() {
    let mut shell = shell(Arc::new(FailingClient), HistoryRetention::All);
    let output = drive(&mut shell, "hello\nagain\n").await;

    // The first error is drawn again when the second turn redraws history.
    assert_eq!(output.matches("An error occurred:").count(), 3);
    assert_eq!(shell.session().history().len(), 4);
}

#[tokio::test]
async fn unknown_command_points_to_help() {
    let mut shell = shell(Arc::new(EchoClient::new("ok")), HistoryRetention::All);
    let output = drive(&mut shell, "/frobnicate\n/help\n").await;

    assert!(output.contains("Unknown command `/frobnicate`"));
    assert!(output.contains(commands::HELP));
}
