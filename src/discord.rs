//! Discord REST API client.
//!
//! Covers the two capabilities the fetch loop consumes: enumerating a
//! guild's channels and requesting one page of a channel's message history
//! older than a cursor.

use reqwest::Client;

use crate::config::{Config, PAGE_SIZE};
use crate::error::{Error, Result};
use crate::history::PageFetcher;
use crate::model::{Channel, Message};

const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Discord client.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: Client,
    token: String,
    base_url: String,
    page_size: usize,
}

impl DiscordClient {
    /// Create client with a bot token.
    pub fn new<S: Into<String>>(token: S) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::MissingConfig("DISCORD_TOKEN".to_string()));
        }

        let http = Client::builder()
            .user_agent("discord_reader/0.1.0")
            .build()
            .map_err(|e| Error::Api(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            token,
            base_url: DISCORD_API_URL.to_string(),
            page_size: PAGE_SIZE,
        })
    }

    /// Create client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(config.require_token()?)?;
        client.page_size = config.page_size.min(PAGE_SIZE);
        Ok(client)
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// List all channels of a guild.
    pub async fn list_channels(&self, guild_id: &str) -> Result<Vec<Channel>> {
        let response = self
            .http
            .get(format!("{}/guilds/{}/channels", self.base_url, guild_id))
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(|e| Error::Api(format!("Channel listing failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Api(format!(
                "Channel listing error {}: {}",
                status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Invalid channel list: {}", e)))
    }
}

impl PageFetcher for DiscordClient {
    async fn fetch_page(&self, channel_id: &str, before: Option<&str>) -> Result<Vec<Message>> {
        let mut url = format!(
            "{}/channels/{}/messages?limit={}",
            self.base_url, channel_id, self.page_size
        );
        if let Some(cursor) = before {
            url.push_str(&format!("&before={}", cursor));
        }

        let response = self
            .http
            .get(&url)
            .header("Authorization", self.authorization())
            .send()
            .await
            .map_err(|e| Error::fetch(channel_id, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::fetch(channel_id, e))?;

        if !status.is_success() {
            return Err(Error::fetch(
                channel_id,
                format!("status {}: {}", status, text),
            ));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::fetch(channel_id, format!("invalid payload: {}", e)))
    }
}
