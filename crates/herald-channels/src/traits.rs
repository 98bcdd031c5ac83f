//! The remote platform seam.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// State of the @everyone role's "view channel" overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Explicitly allowed.
    Allowed,

    /// Explicitly denied.
    Denied,

    /// No explicit overwrite; the guild default applies.
    Inherited,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("allowed"),
            Self::Denied => f.write_str("denied"),
            Self::Inherited => f.write_str("inherited"),
        }
    }
}

/// Coarse channel kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// A guild text channel.
    Text,

    /// Anything else, with a short description.
    Other(String),
}

/// The server a channel belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSnapshot {
    /// Server name.
    pub name: String,

    /// Server icon URL at the configured size, if the server has an icon.
    pub icon_url: Option<String>,
}

/// What delivery needs to know about a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub guild: Option<GuildSnapshot>,

    /// Whether @everyone can send messages, after channel overwrites.
    pub everyone_can_send: bool,

    /// The @everyone "view channel" overwrite.
    pub everyone_view: Visibility,
}

/// Content of a single webhook execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadBody {
    /// Plain message content.
    Content(String),

    /// A file attachment.
    File { name: String, data: Bytes },

    /// A divider embed with previews suppressed.
    Divider { description: String },
}

/// A message posted through a webhook under a display identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: Option<String>,
    pub body: PayloadBody,
}

/// A failed remote call.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// An authenticated session with the chat platform.
///
/// Channel IDs are passed as strings exactly as they appear in templates.
#[async_trait]
pub trait PlatformSession: Send + Sync {
    /// Handle to a channel webhook.
    type Webhook: Send + Sync;

    /// Verify the credentials, returning the bot's display tag.
    async fn current_user(&self) -> Result<String, PlatformError>;

    /// Fetch a channel. `Ok(None)` when it does not exist.
    async fn fetch_channel(&self, channel_id: &str)
        -> Result<Option<ChannelSnapshot>, PlatformError>;

    /// Return the channel's first usable webhook, creating one named `name`
    /// if there is none.
    async fn fetch_or_create_webhook(
        &self,
        channel_id: &str,
        name: &str,
    ) -> Result<Self::Webhook, PlatformError>;

    /// Set the @everyone "view channel" overwrite, keeping its other bits.
    async fn set_everyone_view(
        &self,
        channel_id: &str,
        visibility: Visibility,
    ) -> Result<(), PlatformError>;

    /// Delete up to `limit` of the most recent messages. Returns the count.
    async fn purge_recent(&self, channel_id: &str, limit: u8) -> Result<usize, PlatformError>;

    /// Post through a webhook.
    async fn execute_webhook(
        &self,
        webhook: &Self::Webhook,
        payload: WebhookPayload,
    ) -> Result<(), PlatformError>;

    /// Release a webhook handle.
    async fn release_webhook(&self, webhook: Self::Webhook);

    /// Close the session.
    async fn close(&self);
}
