//! User filtering and supervised-training dataset compilation.
//!
//! Works on stored snapshots, never on live API data: load a snapshot,
//! project it down to one author, or compile it into newline-delimited
//! conversation records.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{ChannelMessages, Message};

/// Channel key used when the input file is a flat message array rather than
/// a channel map.
const FLAT_INPUT_KEY: &str = "messages";

/// One role-tagged turn of a conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// One training example: exactly three turns, system/user/assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub messages: Vec<Turn>,
}

/// The fixed persona prompt used as every record's system turn.
pub fn persona_prompt(name: &str) -> String {
    format!(
        "You are a discord bot representing a person named {name} with the discord handle \
         @{name}. Your mission is to draft messages in {name} style."
    )
}

/// Whether a message may appear in the dataset.
///
/// Messages with attachments, embeds, mentions, or a link in the content are
/// excluded: they rarely read as standalone prose.
pub fn is_trainable(message: &Message) -> bool {
    message.attachments.is_empty()
        && message.embeds.is_empty()
        && message.mentions.is_empty()
        && !message.content.contains("http")
}

/// Load a snapshot file: either a channel map or a flat message array.
pub fn load_messages(path: &Path) -> Result<ChannelMessages> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;

    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e))),
        Value::Array(_) => {
            let messages: Vec<Message> = serde_json::from_value(value)
                .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
            let mut store = ChannelMessages::new();
            store.insert(FLAT_INPUT_KEY.to_string(), messages);
            Ok(store)
        }
        _ => Err(Error::InvalidInput(format!(
            "{}: expected a channel map or a message array",
            path.display()
        ))),
    }
}

/// All messages authored by `user_id`, across every channel.
///
/// Pure projection: channel iteration order, then in-channel order, both
/// preserved as stored.
pub fn filter_messages_by_user(store: &ChannelMessages, user_id: &str) -> Vec<Message> {
    store
        .values()
        .flatten()
        .filter(|message| message.author.id == user_id)
        .cloned()
        .collect()
}

/// Compile a snapshot into newline-delimited conversation records.
///
/// The persona name comes from the first message's author; the input is
/// assumed to be single-author (run `filter` first for multi-author
/// snapshots). Input order is preserved - the compiler never re-sorts.
/// Returns lines joined with `\n` and no trailing newline.
pub fn create_jsonl(store: &ChannelMessages) -> Result<String> {
    let messages: Vec<&Message> = store.values().flatten().collect();

    let Some(first) = messages.first() else {
        warn!("No messages in input; dataset will be empty");
        return Ok(String::new());
    };
    let system = persona_prompt(&first.author.username);

    let mut lines = Vec::new();
    for message in messages.iter().filter(|m| is_trainable(m)) {
        let prompt = message
            .referenced_message
            .as_deref()
            .map(|replied| replied.content.clone())
            .filter(|content| !content.is_empty())
            .unwrap_or_default();

        let record = ConversationRecord {
            messages: vec![
                Turn::new("system", system.clone()),
                Turn::new("user", prompt),
                Turn::new("assistant", message.content.clone()),
            ],
        };
        lines.push(serde_json::to_string(&record)?);
    }

    if lines.is_empty() {
        warn!("No trainable messages after filtering; dataset will be empty");
    }
    Ok(lines.join("\n"))
}
