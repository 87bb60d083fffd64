//! Tests for the jsonl command

use discord_reader::commands::jsonl;
use discord_reader::{ConversationRecord, Error};
use std::path::Path;
use tempfile::tempdir;

#[test]
fn jsonl_writes_one_record_per_eligible_message() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("snapshot.json");
    std::fs::write(
        &input,
        r#"{"42":[
            {"id":"2","author":{"id":"u1","username":"ann"},"timestamp":"200","content":"hi"},
            {"id":"1","author":{"id":"u1","username":"ann"},"timestamp":"100","content":"see https://x"}
        ]}"#,
    )
    .expect("write input");

    let output = jsonl::run(&input, None).expect("run");

    assert_eq!(output, dir.path().join("snapshot.jsonl"));
    let text = std::fs::read_to_string(&output).expect("read output");
    assert!(text.ends_with('\n'), "non-empty dataset ends with newline");

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1, "link message is excluded");
    let record: ConversationRecord = serde_json::from_str(lines[0]).expect("record");
    assert_eq!(record.messages[2].content, "hi");
}

#[test]
fn jsonl_empty_snapshot_writes_empty_file() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("empty.json");
    std::fs::write(&input, "{}").expect("write input");

    let output = jsonl::run(&input, None).expect("run");

    let text = std::fs::read_to_string(&output).expect("read output");
    assert!(text.is_empty());
}

#[test]
fn jsonl_honors_explicit_output_path() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("in.json");
    let explicit = dir.path().join("dataset.jsonl");
    std::fs::write(
        &input,
        r#"{"1":[{"id":"1","author":{"id":"u1","username":"ann"},"timestamp":"100","content":"yo"}]}"#,
    )
    .expect("write input");

    let output = jsonl::run(&input, Some(&explicit)).expect("run");
    assert_eq!(output, explicit);
    assert!(explicit.exists());
}

#[test]
fn jsonl_reply_content_becomes_user_turn() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("replies.json");
    std::fs::write(
        &input,
        r#"{"42":[{
            "id":"2",
            "author":{"id":"u1","username":"ann"},
            "timestamp":"200",
            "content":"sure",
            "referenced_message":{
                "id":"1",
                "author":{"id":"u2","username":"bob"},
                "timestamp":"100",
                "content":"hello"
            }
        }]}"#,
    )
    .expect("write input");

    let output = jsonl::run(&input, None).expect("run");
    let text = std::fs::read_to_string(&output).expect("read output");
    let record: ConversationRecord =
        serde_json::from_str(text.lines().next().unwrap()).expect("record");

    assert_eq!(record.messages[1].content, "hello");
    assert_eq!(record.messages[2].content, "sure");
}

#[test]
fn jsonl_missing_input_is_invalid_input_error() {
    let err = jsonl::run(Path::new("no-such-file.json"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
