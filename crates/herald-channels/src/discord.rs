//! Discord implementation of the platform session, over serenity's HTTP client.

use crate::permissions::{everyone_permissions, role_overwrite, view_visibility, with_view};
use crate::traits::{
    ChannelKind, ChannelSnapshot, GuildSnapshot, PayloadBody, PlatformError, PlatformSession,
    Visibility, WebhookPayload,
};
use async_trait::async_trait;
use herald_core::BotToken;
use serenity::all::{
    Channel, ChannelId, ChannelType, CreateAttachment, CreateEmbed, CreateWebhook,
    ExecuteWebhook, GetMessages, GuildChannel, GuildId, Http, MessageFlags, PartialGuild,
    Permissions, RoleId, User, Webhook,
};
use tracing::{debug, info};

const CDN_BASE: &str = "https://cdn.discordapp.com";

/// A Discord session backed by the REST API.
///
/// Logging in only validates the token; no gateway connection is opened.
pub struct DiscordSession {
    http: Http,
    avatar_size: u16,
}

impl std::fmt::Debug for DiscordSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSession")
            .field("avatar_size", &self.avatar_size)
            .finish()
    }
}

impl DiscordSession {
    /// Create a session for a bot token. Guild icons are requested at
    /// `avatar_size` pixels.
    pub fn new(token: &BotToken, avatar_size: u16) -> Self {
        Self {
            http: Http::new(token.expose_secret()),
            avatar_size,
        }
    }

    async fn guild_channel(&self, channel_id: &str) -> Result<Option<GuildChannel>, PlatformError> {
        let Some(id) = parse_channel_id(channel_id) else {
            return Ok(None);
        };

        match self.http.get_channel(id).await {
            Ok(Channel::Guild(channel)) => Ok(Some(channel)),
            Ok(_) => Ok(None),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(PlatformError::new(e)),
        }
    }

    fn icon_url(&self, guild: &PartialGuild) -> Option<String> {
        guild.icon.as_ref().map(|hash| {
            format!(
                "{}/icons/{}/{}.png?size={}",
                CDN_BASE, guild.id, hash, self.avatar_size
            )
        })
    }
}

fn parse_channel_id(channel_id: &str) -> Option<ChannelId> {
    channel_id
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .map(ChannelId::new)
}

fn everyone_role(guild_id: GuildId) -> RoleId {
    RoleId::new(guild_id.get())
}

fn is_not_found(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(http) => http.status_code().map_or(false, |s| s.as_u16() == 404),
        _ => false,
    }
}

/// `name#discriminator`, or the bare name for accounts without one.
fn login_tag(user: &User) -> String {
    user.tag()
}

fn describe_kind(kind: ChannelType) -> String {
    format!("{:?}", kind).to_lowercase()
}

#[async_trait]
impl PlatformSession for DiscordSession {
    type Webhook = Webhook;

    async fn current_user(&self) -> Result<String, PlatformError> {
        let me = self
            .http
            .get_current_user()
            .await
            .map_err(PlatformError::new)?;
        Ok(login_tag(&me))
    }

    async fn fetch_channel(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelSnapshot>, PlatformError> {
        let Some(id) = parse_channel_id(channel_id) else {
            return Ok(None);
        };

        let channel = match self.http.get_channel(id).await {
            Ok(Channel::Guild(channel)) => channel,
            Ok(_) => {
                return Ok(Some(ChannelSnapshot {
                    id: channel_id.to_string(),
                    name: String::new(),
                    kind: ChannelKind::Other("private".to_string()),
                    guild: None,
                    everyone_can_send: false,
                    everyone_view: Visibility::Inherited,
                }))
            }
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(PlatformError::new(e)),
        };

        let guild = self
            .http
            .get_guild(channel.guild_id)
            .await
            .map_err(PlatformError::new)?;

        let everyone = everyone_role(channel.guild_id);
        let base = guild
            .roles
            .get(&everyone)
            .map(|role| role.permissions)
            .unwrap_or_else(Permissions::empty);
        let effective = everyone_permissions(base, &channel.permission_overwrites, everyone);

        let kind = match channel.kind {
            ChannelType::Text => ChannelKind::Text,
            other => ChannelKind::Other(describe_kind(other)),
        };

        debug!(
            channel_id = %channel.id,
            guild = %guild.name,
            "Fetched channel"
        );

        Ok(Some(ChannelSnapshot {
            id: channel.id.to_string(),
            name: channel.name.clone(),
            kind,
            guild: Some(GuildSnapshot {
                name: guild.name.clone(),
                icon_url: self.icon_url(&guild),
            }),
            everyone_can_send: effective.contains(Permissions::SEND_MESSAGES),
            everyone_view: view_visibility(&channel.permission_overwrites, everyone),
        }))
    }

    async fn fetch_or_create_webhook(
        &self,
        channel_id: &str,
        name: &str,
    ) -> Result<Webhook, PlatformError> {
        let id = parse_channel_id(channel_id)
            .ok_or_else(|| PlatformError::new(format!("invalid channel ID `{}`", channel_id)))?;

        let existing = id
            .webhooks(&self.http)
            .await
            .map_err(PlatformError::new)?
            .into_iter()
            .find(|webhook| webhook.token.is_some());

        match existing {
            Some(webhook) => Ok(webhook),
            None => {
                info!(channel_id = %id, name, "Creating webhook");
                id.create_webhook(&self.http, CreateWebhook::new(name))
                    .await
                    .map_err(PlatformError::new)
            }
        }
    }

    async fn set_everyone_view(
        &self,
        channel_id: &str,
        visibility: Visibility,
    ) -> Result<(), PlatformError> {
        let channel = self
            .guild_channel(channel_id)
            .await?
            .ok_or_else(|| PlatformError::new(format!("channel `{}` disappeared", channel_id)))?;

        let everyone = everyone_role(channel.guild_id);
        let existing = role_overwrite(&channel.permission_overwrites, everyone);
        let overwrite = with_view(existing, everyone, visibility);

        channel
            .id
            .create_permission(&self.http, overwrite)
            .await
            .map_err(PlatformError::new)
    }

    async fn purge_recent(&self, channel_id: &str, limit: u8) -> Result<usize, PlatformError> {
        let id = parse_channel_id(channel_id)
            .ok_or_else(|| PlatformError::new(format!("invalid channel ID `{}`", channel_id)))?;

        let messages = id
            .messages(&self.http, GetMessages::new().limit(limit))
            .await
            .map_err(PlatformError::new)?;

        for message in &messages {
            id.delete_message(&self.http, message.id)
                .await
                .map_err(PlatformError::new)?;
        }

        Ok(messages.len())
    }

    async fn execute_webhook(
        &self,
        webhook: &Webhook,
        payload: WebhookPayload,
    ) -> Result<(), PlatformError> {
        let mut builder = ExecuteWebhook::new().username(payload.username);
        if let Some(avatar_url) = payload.avatar_url {
            builder = builder.avatar_url(avatar_url);
        }

        builder = match payload.body {
            PayloadBody::Content(content) => builder.content(content),
            PayloadBody::File { name, data } => {
                builder.add_file(CreateAttachment::bytes(data.to_vec(), name))
            }
            PayloadBody::Divider { description } => builder
                .embed(CreateEmbed::new().description(description))
                .flags(MessageFlags::SUPPRESS_EMBEDS),
        };

        webhook
            .execute(&self.http, true, builder)
            .await
            .map(|_| ())
            .map_err(PlatformError::new)
    }

    async fn release_webhook(&self, webhook: Webhook) {
        debug!(webhook_id = %webhook.id, "Released webhook");
    }

    async fn close(&self) {
        debug!("Closed Discord session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_id() {
        assert_eq!(parse_channel_id("123"), Some(ChannelId::new(123)));
        assert_eq!(parse_channel_id(" 123 "), Some(ChannelId::new(123)));
        assert_eq!(parse_channel_id("0"), None);
        assert_eq!(parse_channel_id("general"), None);
    }

    #[test]
    fn test_everyone_role_matches_guild() {
        assert_eq!(everyone_role(GuildId::new(77)), RoleId::new(77));
    }

    #[test]
    fn test_describe_kind() {
        assert_eq!(describe_kind(ChannelType::Voice), "voice");
    }

    #[test]
    fn test_login_tag_includes_discriminator() {
        let mut user = User::default();
        user.name = "herald".to_string();
        user.discriminator = std::num::NonZeroU16::new(42);
        assert_eq!(login_tag(&user), "herald#0042");

        user.discriminator = None;
        assert_eq!(login_tag(&user), "herald");
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = DiscordSession::new(&BotToken::new("secret-token"), 2048);
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
    }
}
