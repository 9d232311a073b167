use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use reblog_discord::{DEFAULT_HALF_WIDTH, DISCORD_API_BASE, MAX_PAGE_LIMIT};
use reblog_persist::StoreBackend;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub discord: DiscordConfig,
    pub cache: CacheConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub discord_bot_token: String,
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Guild whose text channels are listed
    pub guild_id: String,
    /// Users outside this guild are refused
    #[serde(default)]
    pub required_guild_id: Option<String>,
    #[serde(default = "default_half_width")]
    pub window_half_width: u32,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_api_base() -> String {
    DISCORD_API_BASE.to_string()
}

fn default_half_width() -> u32 {
    DEFAULT_HALF_WIDTH
}

fn default_page_limit() -> u32 {
    50
}

impl DiscordConfig {
    /// Requested page size, defaulted and capped at Discord's maximum
    pub fn page_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.page_limit).min(MAX_PAGE_LIMIT)
    }

    pub fn half_width(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.window_half_width)
            .min(MAX_PAGE_LIMIT)
    }

    /// Empty strings in env or TOML mean "no gate"
    pub fn required_guild(&self) -> Option<&str> {
        self.required_guild_id
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub sweep_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Environment variables that override single TOML keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("CORS_ENABLED", "cors.enabled"),
    ("DISCORD_API_BASE", "discord.api_base"),
    ("DISCORD_GUILD_ID", "discord.guild_id"),
    ("DISCORD_REQUIRED_GUILD_ID", "discord.required_guild_id"),
    ("DISCORD_WINDOW_HALF_WIDTH", "discord.window_half_width"),
    ("DISCORD_PAGE_LIMIT", "discord.page_limit"),
    ("CACHE_ENABLED", "cache.enabled"),
    ("CACHE_TTL_SECS", "cache.ttl_secs"),
    ("CACHE_SWEEP_SECS", "cache.sweep_secs"),
    ("STORE_BACKEND", "store.backend"),
    ("STORE_DATABASE", "store.database"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, DISCORD_, CACHE_, STORE_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        let builder = with_env_overrides(builder, |name| std::env::var(name).ok())?;

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_secrets(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Fill secrets from the environment. The bot token is always required;
    /// the MongoDB URI only for the mongodb backend.
    pub fn apply_secrets(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        self.discord_bot_token = lookup("DISCORD_BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Message("DISCORD_BOT_TOKEN environment variable is required".to_string())
            })?;

        if self.store.backend == StoreBackend::MongoDb {
            self.mongodb_uri = lookup("MONGODB_URI")
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| {
                    ConfigError::Message(
                        "MONGODB_URI environment variable is required for the mongodb store"
                            .to_string(),
                    )
                })?;
        }

        Ok(())
    }
}

fn with_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for &(var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, lookup(var))?;
    }
    Ok(builder)
}
