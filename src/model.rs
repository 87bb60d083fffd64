//! Message and channel types shared by the fetch loop and the dataset tools.
//!
//! These mirror the subset of the Discord REST payloads the tool actually
//! uses; unknown fields are ignored and list fields default to empty, since
//! payload schema validation is out of scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accumulated history: channel id -> messages in chronological order.
///
/// A BTreeMap keeps channel iteration order deterministic, which in turn
/// keeps snapshot files and dataset output stable across runs.
pub type ChannelMessages = BTreeMap<String, Vec<Message>>;

/// Message author (id plus display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// File attached to a message. Only identity fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub url: String,
}

/// One Discord message as stored in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub author: Author,
    /// Creation time as delivered by the API. Either a raw numeric string
    /// (older snapshot fixtures) or an RFC 3339 timestamp (live API).
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub embeds: Vec<serde_json::Value>,
    #[serde(default)]
    pub mentions: Vec<Author>,
    /// The message this one replies to, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_message: Option<Box<Message>>,
}

impl Message {
    /// Numeric ordering key for the timestamp.
    ///
    /// Message ids are opaque and not numerically sortable, so timestamps
    /// are the authoritative ordering key. Unparsable values sort first.
    pub fn timestamp_value(&self) -> f64 {
        if let Ok(n) = self.timestamp.parse::<f64>() {
            return n;
        }
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.timestamp_millis() as f64)
            .unwrap_or(0.0)
    }
}

/// Sort messages ascending by timestamp. Stable: ties keep API order.
pub fn sort_by_timestamp(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.timestamp_value().total_cmp(&b.timestamp_value()));
}

/// A guild channel as returned by the channel listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Channel {
    pub const GUILD_TEXT: u8 = 0;
    pub const GUILD_ANNOUNCEMENT: u8 = 5;

    /// Whether the channel carries message history worth fetching.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, Self::GUILD_TEXT | Self::GUILD_ANNOUNCEMENT)
    }
}
