// Discord REST client (HTTP direct, bot token)

use async_trait::async_trait;
use reblog_types::{Channel, Message, ReactionGroup};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{Result, SourceError};
use crate::observer::{NoopObserver, SourceObserver};
use crate::reactions::{group_reactions, RawReaction};
use crate::traits::{Direction, MessageSource};
use crate::wire::{DiscordChannel, DiscordMessage, DiscordUser};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Largest page Discord serves for message and reaction listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Discord client authenticated as a bot.
pub struct DiscordClient {
    http_client: reqwest::Client,
    base_url: String,
    observer: Arc<dyn SourceObserver>,
}

impl DiscordClient {
    /// Create new client with a bot token
    pub fn new(bot_token: impl Into<String>) -> Result<Self> {
        let bot_token = bot_token.into();
        if bot_token.trim().is_empty() {
            return Err(SourceError::Config("bot token is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bot {}", bot_token))
                .map_err(|_| SourceError::Config("invalid bot token format".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("DiscordBot (discord-reblog, ", env!("CARGO_PKG_VERSION"), ")"))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: DISCORD_API_BASE.to_string(),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Point the client at another API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SourceObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Config(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Config(format!("base url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON resource, mapping 404 and other failures into `SourceError`
    async fn get_json<T: DeserializeOwned>(
        &self,
        label: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.observer.on_api_call(label);
        tracing::debug!(endpoint = %label, url = %url, "Requesting Discord API");

        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::NotFound(format!("{}: {}", label, body)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(endpoint = %label, status = %status, "Discord API returned an error");
            return Err(SourceError::Upstream {
                endpoint: label.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Malformed {
            endpoint: label.to_string(),
            detail: e.to_string(),
        })
    }

    async fn get_raw_message(&self, channel_id: &str, message_id: &str) -> Result<DiscordMessage> {
        let url = self.endpoint(&["channels", channel_id, "messages", message_id])?;
        self.get_json("GET /channels/{channel}/messages/{message}", url, &[])
            .await
    }

    /// Newest-first page of messages, exactly as Discord returns it
    async fn get_message_page(
        &self,
        channel_id: &str,
        anchor: Option<(Direction, &str)>,
        limit: u32,
    ) -> Result<Vec<DiscordMessage>> {
        let url = self.endpoint(&["channels", channel_id, "messages"])?;
        let mut query = Vec::with_capacity(2);
        if let Some((direction, anchor_id)) = anchor {
            query.push((direction.as_query_key(), anchor_id.to_string()));
        }
        query.push(("limit", limit.min(MAX_PAGE_LIMIT).to_string()));

        self.get_json("GET /channels/{channel}/messages", url, &query)
            .await
    }

    /// Flatten the per-emoji user listings into one row per (user, emoji)
    async fn reaction_rows(
        &self,
        channel_id: &str,
        message: &DiscordMessage,
    ) -> Result<Vec<RawReaction>> {
        let mut rows = Vec::new();

        for reaction in &message.reactions {
            let Some(segment) = reaction.emoji.path_segment() else {
                continue;
            };
            let users = self
                .reaction_users(channel_id, &message.id, &segment)
                .await?;

            let emoji_name = reaction.emoji.name.clone().unwrap_or_default();
            rows.extend(users.into_iter().map(|user| RawReaction {
                user: user.into(),
                emoji_id: reaction.emoji.id.clone(),
                emoji_name: emoji_name.clone(),
            }));
        }

        Ok(rows)
    }

    /// Every user who reacted with one emoji, following the `after` cursor
    /// until a short page comes back
    async fn reaction_users(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji_segment: &str,
    ) -> Result<Vec<DiscordUser>> {
        let url = self.endpoint(&[
            "channels",
            channel_id,
            "messages",
            message_id,
            "reactions",
            emoji_segment,
        ])?;

        let mut users: Vec<DiscordUser> = Vec::new();
        loop {
            let mut query = vec![("limit", MAX_PAGE_LIMIT.to_string())];
            if let Some(last) = users.last() {
                query.push(("after", last.id.clone()));
            }

            let page: Vec<DiscordUser> = self
                .get_json(
                    "GET /channels/{channel}/messages/{message}/reactions/{emoji}",
                    url.clone(),
                    &query,
                )
                .await?;

            let full = page.len() >= MAX_PAGE_LIMIT as usize;
            users.extend(page);
            if !full {
                break;
            }
        }

        tracing::debug!(
            message_id = %message_id,
            emoji = %emoji_segment,
            count = users.len(),
            "Fetched reaction users"
        );
        Ok(users)
    }
}

fn into_chronological(page: Vec<DiscordMessage>, channel_id: &str) -> Vec<Message> {
    // Discord pages are newest first
    page.into_iter()
        .rev()
        .map(|m| m.into_message(channel_id))
        .collect()
}

#[async_trait]
impl MessageSource for DiscordClient {
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
        include_reactions: bool,
    ) -> Result<Message> {
        let raw = self.get_raw_message(channel_id, message_id).await?;

        if include_reactions && !raw.reactions.is_empty() {
            let rows = self.reaction_rows(channel_id, &raw).await?;
            let mut message = raw.into_message(channel_id);
            message.reactions = group_reactions(rows);
            return Ok(message);
        }

        Ok(raw.into_message(channel_id))
    }

    async fn fetch_directional(
        &self,
        channel_id: &str,
        reference_id: &str,
        direction: Direction,
        limit: u32,
        cursor_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let anchor = cursor_id.unwrap_or(reference_id);
        let page = self
            .get_message_page(channel_id, Some((direction, anchor)), limit)
            .await?;

        tracing::debug!(
            channel_id = %channel_id,
            anchor = %anchor,
            direction = %direction,
            count = page.len(),
            "Fetched directional page"
        );

        Ok(into_chronological(page, channel_id))
    }

    async fn fetch_latest(&self, channel_id: &str, limit: u32) -> Result<Vec<Message>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let page = self.get_message_page(channel_id, None, limit).await?;
        Ok(into_chronological(page, channel_id))
    }

    async fn fetch_channels(&self, guild_id: &str) -> Result<Vec<Channel>> {
        let url = self.endpoint(&["guilds", guild_id, "channels"])?;
        let channels: Vec<DiscordChannel> = self
            .get_json("GET /guilds/{guild}/channels", url, &[])
            .await?;

        Ok(channels
            .into_iter()
            .map(Channel::from)
            .filter(Channel::is_text)
            .collect())
    }

    async fn fetch_reactions(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<Vec<ReactionGroup>> {
        let raw = self.get_raw_message(channel_id, message_id).await?;
        let rows = self.reaction_rows(channel_id, &raw).await?;
        Ok(group_reactions(rows))
    }
}
