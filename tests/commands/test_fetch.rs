//! Tests for the fetch command

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

use discord_reader::{
    drain_channel, fetch_channels, Author, Channel, ChannelMessages, Error, FetchOptions, Message,
    PageFetcher, Result,
};
use tempfile::tempdir;

// Fetch-command tests that clear credentials must not interleave.
static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[tokio::test]
async fn fetch_without_token_fails_before_any_request() {
    let _env = ENV_LOCK.lock().unwrap();
    std::env::remove_var("DISCORD_TOKEN");
    std::env::remove_var("DISCORD_GUILD_ID");

    let err = discord_reader::commands::fetch::run(&[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingConfig(_)));
}

/// Scripted fetcher used to exercise the orchestrator end to end.
struct ScriptedFetcher {
    pages: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Vec<Message>>) -> Self {
        Self {
            pages: Mutex::new(pages),
        }
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, _channel_id: &str, _before: Option<&str>) -> Result<Vec<Message>> {
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(pages.remove(0))
        }
    }
}

fn message(id: &str, timestamp: &str) -> Message {
    Message {
        id: id.to_string(),
        author: Author {
            id: "u1".to_string(),
            username: "ann".to_string(),
        },
        timestamp: timestamp.to_string(),
        content: format!("msg {}", id),
        attachments: Vec::new(),
        embeds: Vec::new(),
        mentions: Vec::new(),
        referenced_message: None,
    }
}

#[tokio::test]
async fn orchestrated_fetch_writes_per_channel_and_combined_snapshots() {
    let dir = tempdir().expect("tempdir");
    let options = FetchOptions::new(dir.path()).with_page_delay(Duration::ZERO);

    let fetcher = ScriptedFetcher::new(vec![vec![message("2", "200"), message("1", "100")]]);
    let channels = vec![Channel {
        id: "42".to_string(),
        name: "general".to_string(),
        kind: Channel::GUILD_TEXT,
    }];

    let store = fetch_channels(&fetcher, &channels, &HashSet::new(), &options)
        .await
        .expect("fetch");

    assert_eq!(store["42"].len(), 2);
    assert!(dir.path().join("42-messages.json").exists());

    let combined = std::fs::read_to_string(dir.path().join("all-channel-messages.json"))
        .expect("combined snapshot");
    let on_disk: ChannelMessages = serde_json::from_str(&combined).expect("valid json");
    assert_eq!(on_disk, store);
}

#[tokio::test]
async fn snapshot_written_during_fetch_feeds_the_dataset_pipeline() {
    // fetch -> snapshot -> jsonl, the full offline round trip.
    let dir = tempdir().expect("tempdir");
    let options = FetchOptions::new(dir.path()).with_page_delay(Duration::ZERO);

    let fetcher = ScriptedFetcher::new(vec![vec![message("2", "200"), message("1", "100")]]);
    let mut store = ChannelMessages::new();
    drain_channel(&fetcher, "42", &mut store, &options)
        .await
        .expect("drain");

    let snapshot = dir.path().join("42-messages.json");
    let output = discord_reader::commands::jsonl::run(&snapshot, None).expect("jsonl");

    let text = std::fs::read_to_string(&output).expect("read dataset");
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("\"assistant\""));
}
