use serde::Serialize;
use url::Url;

/// Ids carried by a Discord message link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageLink {
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
}

/// Parse `https://discord.com/channels/{guild}/{channel}/{message}`.
///
/// Returns `None` for anything that is not exactly that shape on a
/// `discord.com` host.
pub fn parse_message_link(link: &str) -> Option<MessageLink> {
    let url = Url::parse(link.trim()).ok()?;

    if !url.host_str()?.contains("discord.com") {
        return None;
    }

    let parts: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        ["channels", guild, channel, message] => Some(MessageLink {
            guild_id: guild.to_string(),
            channel_id: channel.to_string(),
            message_id: message.to_string(),
        }),
        _ => None,
    }
}
