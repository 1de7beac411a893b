//! Unit tests for session history.

use super::*;

fn exchange(history: &mut ConversationHistory, question: &str, answer: &str) {
    history.append(Turn::user(question));
    history.append(Turn::assistant(answer));
}

#[test]
fn history_keeps_insertion_order() {
    let mut history = ConversationHistory::new();
    exchange(&mut history, "first", "one");
    exchange(&mut history, "second", "two");

    let contents: Vec<_> = history.all().iter().map(Turn::content).collect();
    assert_eq!(contents, ["first", "one", "second", "two"]);
    assert_eq!(history.all()[0].role(), Role::User);
    assert_eq!(history.all()[1].role(), Role::Assistant);
}

#[test]
fn questions_lists_user_turns() {
    let mut history = ConversationHistory::new();
    exchange(&mut history, "what is a list?", "a sequence");
    exchange(&mut history, "and a dict?", "a mapping");

    let questions: Vec<_> = history.questions().collect();
    assert_eq!(questions, ["what is a list?", "and a dict?"]);
}

#[test]
fn latest_retention_shows_last_exchange() {
    let mut history = ConversationHistory::new();
    assert!(history.visible(HistoryRetention::Latest).is_empty());

    exchange(&mut history, "q1", "a1");
    exchange(&mut history, "q2", "a2");

    let latest = history.visible(HistoryRetention::Latest);
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].content(), "q2");
    assert_eq!(latest[1].content(), "a2");
    assert_eq!(history.visible(HistoryRetention::All).len(), 4);
}

#[test]
fn retention_parses_from_config_strings() {
    assert_eq!("all".parse::<HistoryRetention>(), Ok(HistoryRetention::All));
    assert_eq!(" Latest ".parse::<HistoryRetention>(), Ok(HistoryRetention::Latest));
    assert!("forever".parse::<HistoryRetention>().is_err());
}

#[test]
fn sessions_are_isolated() {
    let mut a = Session::new(HistoryRetention::All);
    let b = Session::new(HistoryRetention::Latest);
    a.history_mut().append(Turn::user("only in a"));

    assert_ne!(a.id(), b.id());
    assert_eq!(a.history().len(), 1);
    assert!(b.history().is_empty());
    assert_eq!(b.retention(), HistoryRetention::Latest);
}

#[test]
fn turn_serializes_lowercase_role() {
    let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
    assert_eq!(json["role"], "assistant");
    assert_eq!(json["content"], "hi");
}
