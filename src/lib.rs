//! Discord Chat History Exporter & Dataset Builder Library
//!
//! This library provides tools to:
//! - Walk every text channel of a guild backward in time, page by page
//! - Checkpoint accumulated history to JSON snapshots after each page
//! - Filter stored snapshots down to a single author's messages
//! - Compile snapshots into JSONL conversation records for fine-tuning

pub mod config;
pub mod dataset;
pub mod discord;
pub mod error;
pub mod history;
pub mod lock;
pub mod metrics;
pub mod model;

// Re-export common types
pub use config::Config;
pub use dataset::{create_jsonl, filter_messages_by_user, ConversationRecord, Turn};
pub use discord::DiscordClient;
pub use error::{Error, Result};
pub use history::{drain_channel, fetch_channels, FetchOptions, PageFetcher};
pub use lock::FetchLock;
pub use model::{Author, Channel, ChannelMessages, Message};

pub mod commands;
