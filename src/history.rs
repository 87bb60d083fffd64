//! Channel history accumulation with crash-safe checkpointing.
//!
//! Walks each channel's history backward in time, one page at a time, and
//! rewrites the on-disk snapshot after every page so a crash loses at most
//! the latest unwritten page.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::config::PAGE_DELAY_MS;
use crate::error::Result;
use crate::metrics;
use crate::model::{sort_by_timestamp, Channel, ChannelMessages};

/// One page of a channel's history, older than the given cursor.
///
/// Implementations return up to [`crate::config::PAGE_SIZE`] messages in whatever order the
/// remote API provides; the newest page when no cursor is given. Failures are
/// terminal for that channel only.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, channel_id: &str, before: Option<&str>) -> Result<Vec<crate::model::Message>>;
}

/// Where snapshots go and how fast pages are requested.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub output_dir: PathBuf,
    pub page_delay: Duration,
}

impl FetchOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
        }
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    fn channel_snapshot(&self, channel_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}-messages.json", channel_id))
    }

    fn combined_snapshot(&self) -> PathBuf {
        self.output_dir.join("all-channel-messages.json")
    }
}

/// Write the accumulated history to a snapshot file, overwriting it.
pub fn write_snapshot(store: &ChannelMessages, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json)?;
    Ok(())
}

/// Drain one channel's full history into `store`, oldest-first.
///
/// The cursor is always the oldest message of the last page, so each request
/// moves strictly backward in time and the loop halts on the first empty
/// page. The snapshot covers every channel processed so far and is rewritten
/// after each page, before the throttle pause. Returns the number of pages
/// fetched. A fetch error propagates after the last snapshot is durable.
pub async fn drain_channel<F: PageFetcher>(
    fetcher: &F,
    channel_id: &str,
    store: &mut ChannelMessages,
    options: &FetchOptions,
) -> Result<usize> {
    let mut before: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let mut page = fetcher.fetch_page(channel_id, before.as_deref()).await?;
        if page.is_empty() {
            // History exhausted. A channel with no messages writes nothing.
            break;
        }

        sort_by_timestamp(&mut page);
        before = Some(page[0].id.clone());
        pages += 1;
        metrics::record_page_fetched(channel_id, page.len());

        // Pages arrive newest-first across iterations, so splice each page
        // in front of what is already accumulated to keep the stored
        // sequence chronological.
        let fetched = page.len();
        let messages = store.entry(channel_id.to_string()).or_default();
        page.extend(messages.drain(..));
        *messages = page;
        let total = messages.len();

        write_snapshot(store, &options.channel_snapshot(channel_id))?;
        info!(
            channel = channel_id,
            page = pages,
            fetched,
            total,
            "Fetched page"
        );

        // Static throttle between page requests, not adaptive to the API.
        tokio::time::sleep(options.page_delay).await;
    }

    Ok(pages)
}

/// Fetch every text channel not in the skip set, one channel at a time.
///
/// A failure in one channel is logged and the run continues; snapshots
/// written so far stay valid and partial. The combined snapshot is written
/// once after all channels complete.
pub async fn fetch_channels<F: PageFetcher>(
    fetcher: &F,
    channels: &[Channel],
    skip: &HashSet<String>,
    options: &FetchOptions,
) -> Result<ChannelMessages> {
    let mut store = ChannelMessages::new();

    for channel in channels {
        if skip.contains(&channel.id) {
            info!(channel = %channel.id, name = %channel.name, "Skipping channel");
            continue;
        }
        if !channel.is_text() {
            continue;
        }

        info!(channel = %channel.id, name = %channel.name, "Fetching channel history");
        match drain_channel(fetcher, &channel.id, &mut store, options).await {
            Ok(pages) => {
                let total = store.get(&channel.id).map_or(0, Vec::len);
                info!(channel = %channel.id, pages, total, "Channel history exhausted");
            }
            Err(err) => {
                // Channel-scoped failure; everything fetched so far is
                // already on disk.
                error!(channel = %channel.id, "Fetch stopped: {}", err);
            }
        }
    }

    write_snapshot(&store, &options.combined_snapshot())?;
    Ok(store)
}
