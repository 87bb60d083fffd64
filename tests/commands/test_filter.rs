//! Tests for the filter command

use discord_reader::commands::filter;
use discord_reader::{Error, Message};
use std::path::Path;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{"42":[
    {"id":"2","author":{"id":"u1","username":"ann"},"timestamp":"200","content":"hi"},
    {"id":"3","author":{"id":"u2","username":"bob"},"timestamp":"300","content":"hey"},
    {"id":"1","author":{"id":"u1","username":"ann"},"timestamp":"100","content":"yo"}
]}"#;

#[test]
fn filter_writes_only_matching_author() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("all-channel-messages.json");
    std::fs::write(&input, SNAPSHOT).expect("write input");

    let output = filter::run("u1", &input, None).expect("run");

    assert_eq!(
        output,
        dir.path().join("user-u1-messages.json"),
        "default output lands next to the input"
    );
    let text = std::fs::read_to_string(&output).expect("read output");
    let messages: Vec<Message> = serde_json::from_str(&text).expect("array of messages");
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.author.id == "u1"));
    // Stored order preserved, no re-sorting.
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[1].content, "yo");
}

#[test]
fn filter_honors_explicit_output_path() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    let explicit = dir.path().join("picked.json");
    std::fs::write(&input, SNAPSHOT).expect("write input");

    let output = filter::run("u2", &input, Some(&explicit)).expect("run");

    assert_eq!(output, explicit);
    let text = std::fs::read_to_string(&explicit).expect("read output");
    let messages: Vec<Message> = serde_json::from_str(&text).expect("array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hey");
}

#[test]
fn filter_accepts_flat_array_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("flat.json");
    std::fs::write(
        &input,
        r#"[{"id":"1","author":{"id":"u1","username":"ann"},"timestamp":"100","content":"yo"}]"#,
    )
    .expect("write input");

    let output = filter::run("u1", &input, None).expect("run");
    let text = std::fs::read_to_string(&output).expect("read output");
    let messages: Vec<Message> = serde_json::from_str(&text).expect("array");
    assert_eq!(messages.len(), 1);
}

#[test]
fn filter_rejects_blank_user_id() {
    let err = filter::run("  ", Path::new("irrelevant.json"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn filter_missing_input_is_invalid_input_error() {
    let err = filter::run("u1", Path::new("no-such-file.json"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn filter_unknown_author_writes_empty_array() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    std::fs::write(&input, SNAPSHOT).expect("write input");

    let output = filter::run("u9", &input, None).expect("run");
    let text = std::fs::read_to_string(&output).expect("read output");
    let messages: Vec<Message> = serde_json::from_str(&text).expect("array");
    assert!(messages.is_empty());
}
