//! Fetch command: export every text channel's history to JSON snapshots.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::config::{Config, LOCK_FILE};
use crate::discord::DiscordClient;
use crate::error::Result;
use crate::history::{fetch_channels, FetchOptions};
use crate::lock::FetchLock;
use crate::model::ChannelMessages;

/// Run a full fetch: enumerate channels, drain each one, snapshot as we go.
///
/// `skip` extends the skip list from config.yml. A missing token or guild id
/// fails here, before any request is made.
pub async fn run(skip: &[String], output: Option<&Path>) -> Result<ChannelMessages> {
    let config = Config::new();
    config.require_token()?;
    let guild_id = config.require_guild_id()?;

    // One fetch run at a time; snapshots are rewritten in place.
    let _lock = FetchLock::acquire(Path::new(LOCK_FILE))?;

    let client = DiscordClient::from_config(&config)?;
    let channels = client.list_channels(guild_id).await?;
    info!(guild = guild_id, "Found {} channels", channels.len());

    let skip_set: HashSet<String> = config
        .skip_channels
        .iter()
        .chain(skip.iter())
        .cloned()
        .collect();

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.clone());
    let options = FetchOptions::new(output_dir).with_page_delay(config.page_delay());

    let store = fetch_channels(&client, &channels, &skip_set, &options).await?;

    let total: usize = store.values().map(Vec::len).sum();
    info!(
        channels = store.len(),
        messages = total,
        "Fetch complete; combined snapshot written"
    );
    Ok(store)
}
