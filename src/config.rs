//! Configuration for the Discord API credential and fetch behavior
//!
//! Loads configuration from config.yml file; environment variables fill in
//! missing values, and `${VAR}` placeholders in the YAML resolve through the
//! environment so the token never has to live in the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const LOCK_FILE: &str = "discord_fetch.lock";
pub const OUTPUT_DIR: &str = "data";
pub const PAGE_SIZE: usize = 100;
pub const PAGE_DELAY_MS: u64 = 1000;

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    discord: Option<DiscordConfig>,
    output: Option<OutputConfig>,
    fetch: Option<FetchConfig>,
}

#[derive(Debug, Deserialize)]
struct DiscordConfig {
    token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    guild_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutputConfig {
    dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FetchConfig {
    page_size: Option<usize>,
    page_delay_ms: Option<u64>,
    #[serde(default)]
    skip_channels: Vec<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub guild_id: String,
    pub output_dir: PathBuf,
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub skip_channels: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults.
    /// Environment variables take precedence over missing config.yml values.
    pub fn new() -> Self {
        Self::load_from_path(Path::new("config.yml"))
            .or_else(|_| Self::load_from_path(Path::new("../config.yml")))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Load configuration from a specific YAML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let yaml: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;

        let discord = yaml.discord;
        let token = Self::resolve_env_string(
            discord.as_ref().and_then(|d| d.token.clone()),
            "DISCORD_TOKEN",
        );
        let guild_id = Self::resolve_env_string(
            discord.as_ref().and_then(|d| d.guild_id.clone()),
            "DISCORD_GUILD_ID",
        );
        let output_dir = Self::resolve_env_string(
            yaml.output.and_then(|o| o.dir),
            "OUTPUT_DIR",
        );
        let fetch = yaml.fetch;

        Ok(Self {
            token,
            guild_id,
            output_dir: Self::output_dir_or_default(output_dir),
            page_size: fetch
                .as_ref()
                .and_then(|f| f.page_size)
                .unwrap_or(PAGE_SIZE)
                .min(PAGE_SIZE),
            page_delay_ms: fetch
                .as_ref()
                .and_then(|f| f.page_delay_ms)
                .unwrap_or(PAGE_DELAY_MS),
            skip_channels: fetch.map(|f| f.skip_channels).unwrap_or_default(),
        })
    }

    /// Environment-only configuration (no config.yml present).
    pub fn defaults() -> Self {
        Self {
            token: std::env::var("DISCORD_TOKEN").unwrap_or_default(),
            guild_id: std::env::var("DISCORD_GUILD_ID").unwrap_or_default(),
            output_dir: Self::output_dir_or_default(
                std::env::var("OUTPUT_DIR").unwrap_or_default(),
            ),
            page_size: PAGE_SIZE,
            page_delay_ms: PAGE_DELAY_MS,
            skip_channels: Vec::new(),
        }
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                // Extract var name from ${VAR_NAME}
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return env_val;
                }
            } else if !v.is_empty() {
                return v.clone();
            }
        }
        // Fallback: check explicit env_key
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        value.unwrap_or_default()
    }

    fn output_dir_or_default(dir: String) -> PathBuf {
        if dir.is_empty() {
            PathBuf::from(OUTPUT_DIR)
        } else {
            PathBuf::from(dir)
        }
    }

    /// The bot token, required before any fetch work begins.
    pub fn require_token(&self) -> Result<&str> {
        if self.token.trim().is_empty() {
            return Err(Error::MissingConfig("DISCORD_TOKEN".to_string()));
        }
        Ok(&self.token)
    }

    /// The guild whose channels are enumerated.
    pub fn require_guild_id(&self) -> Result<&str> {
        if self.guild_id.trim().is_empty() {
            return Err(Error::MissingConfig("DISCORD_GUILD_ID".to_string()));
        }
        Ok(&self.guild_id)
    }

    /// Fixed pause between page requests.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
