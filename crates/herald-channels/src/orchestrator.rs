//! Delivery orchestration.
//!
//! A run authenticates once, then:
//!
//! 1. resolves every target (channel, webhook, sender identity, visibility
//!    snapshot), aborting before any mutation if one fails;
//! 2. hides each channel from @everyone and purges its recent messages;
//! 3. posts each target's messages in source order, then restores its
//!    visibility;
//! 4. releases every webhook handle and closes the session, on every path.
//!
//! There is no cross-channel transaction. If the process dies between hiding
//! and restoring a channel, it stays hidden until restored by hand; a later
//! run sees the view as denied and leaves it that way.

use crate::attachment::{attachment_name, ImageSource};
use crate::error::DeliveryError;
use crate::traits::{
    ChannelKind, PayloadBody, PlatformError, PlatformSession, Visibility, WebhookPayload,
};
use crate::Result;
use herald_core::config::DeliveryConfig;
use herald_core::split::{split_message, SplitOptions};
use herald_core::{BotToken, ChannelData, Message, Reporter};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Counts from a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    /// Channels delivered to.
    pub channels: usize,

    /// Webhook executions across all channels.
    pub messages: usize,

    /// Prior messages purged across all channels.
    pub purged: usize,

    /// Text messages that had to be split.
    pub splits: usize,
}

/// A resolved delivery target.
struct WebhookTarget<'a, W> {
    data: &'a ChannelData,
    channel_name: String,
    guild_name: String,
    webhook: W,
    sender_name: String,
    sender_avatar: Option<String>,
    visibility: Visibility,
}

/// Delivers channel data through a platform session.
pub struct Deliverer<S> {
    session: S,
    config: DeliveryConfig,
    reporter: Arc<dyn Reporter>,
    client: reqwest::Client,
}

impl<S: PlatformSession> Deliverer<S> {
    /// Create a deliverer that owns `session` for the duration of a run.
    pub fn new(session: S, config: DeliveryConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            session,
            config,
            reporter,
            client: reqwest::Client::new(),
        }
    }

    /// Run delivery for every target, consuming the session.
    ///
    /// Webhook handles and the session are released whether or not the run
    /// succeeds.
    pub async fn deliver(self, data: &[ChannelData]) -> Result<DeliverySummary> {
        let mut targets = Vec::with_capacity(data.len());
        let outcome = self.run(data, &mut targets).await;

        for target in targets {
            self.session.release_webhook(target.webhook).await;
        }
        self.session.close().await;

        outcome
    }

    async fn run<'a>(
        &self,
        data: &'a [ChannelData],
        targets: &mut Vec<WebhookTarget<'a, S::Webhook>>,
    ) -> Result<DeliverySummary> {
        let tag = self.authenticate().await?;
        self.reporter.info(&format!("Logged in as {}", tag));

        for entry in data {
            let target = self.resolve(entry).await?;
            targets.push(target);
        }

        let mut summary = DeliverySummary::default();

        for target in targets.iter() {
            if target.visibility != Visibility::Denied {
                self.remote(
                    "hide channel",
                    target.data,
                    self.session
                        .set_everyone_view(&target.data.channel_id, Visibility::Denied),
                )
                .await?;
            }

            let purged = self
                .remote(
                    "purge messages",
                    target.data,
                    self.session
                        .purge_recent(&target.data.channel_id, self.config.purge_limit),
                )
                .await?;
            debug!(channel_id = %target.data.channel_id, purged, "Purged channel");
            summary.purged += purged;
        }

        for target in targets.iter() {
            let (sent, splits) = self.dispatch(target).await?;

            if target.visibility != Visibility::Denied {
                self.remote(
                    "restore visibility",
                    target.data,
                    self.session
                        .set_everyone_view(&target.data.channel_id, target.visibility),
                )
                .await?;
            }

            self.reporter.info(&format!(
                "Sent {} message(s) to #{} in {}",
                sent, target.channel_name, target.guild_name
            ));

            summary.channels += 1;
            summary.messages += sent;
            summary.splits += splits;
        }

        Ok(summary)
    }

    async fn authenticate(&self) -> Result<String> {
        let call = self.session.current_user();
        let result = match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| DeliveryError::Auth(format!("timed out after {}s", limit.as_secs())))?,
            None => call.await,
        };
        result.map_err(|e| DeliveryError::Auth(e.to_string()))
    }

    async fn resolve<'a>(&self, data: &'a ChannelData) -> Result<WebhookTarget<'a, S::Webhook>> {
        let channel_id = &data.channel_id;

        let channel = self
            .remote("fetch channel", data, self.session.fetch_channel(channel_id))
            .await?
            .ok_or_else(|| DeliveryError::ChannelNotFound {
                channel_id: channel_id.clone(),
                file: data.path.clone(),
            })?;

        if channel.kind != ChannelKind::Text {
            return Err(DeliveryError::WrongChannelType {
                channel_id: channel_id.clone(),
                file: data.path.clone(),
            });
        }

        let guild = channel.guild.ok_or_else(|| DeliveryError::MissingGuild {
            channel_id: channel_id.clone(),
            file: data.path.clone(),
        })?;

        if channel.everyone_can_send {
            return Err(DeliveryError::ChannelTooOpen {
                channel_id: channel_id.clone(),
                file: data.path.clone(),
            });
        }

        let webhook = self
            .remote(
                "fetch webhook",
                data,
                self.session
                    .fetch_or_create_webhook(channel_id, &self.config.webhook_name),
            )
            .await?;

        let sender_name = data
            .sender_name
            .clone()
            .unwrap_or_else(|| guild.name.clone());
        let sender_avatar = data.sender_image.clone().or(guild.icon_url);

        info!(
            channel_id = %channel_id,
            channel = %channel.name,
            visibility = %channel.everyone_view,
            "Resolved channel"
        );

        Ok(WebhookTarget {
            data,
            channel_name: channel.name,
            guild_name: guild.name,
            webhook,
            sender_name,
            sender_avatar,
            visibility: channel.everyone_view,
        })
    }

    /// Post a target's messages in order. Returns (executions, splits).
    async fn dispatch(&self, target: &WebhookTarget<'_, S::Webhook>) -> Result<(usize, usize)> {
        let data = target.data;
        let mut sent = 0;
        let mut splits = 0;

        for message in &data.messages {
            match message {
                Message::Image { caption, url } => {
                    let source = ImageSource::parse(url);
                    let name = attachment_name(caption, &source);
                    debug!(url = %url, name = %name, mime = %source.mime_type(), "Sending image");

                    let bytes = self
                        .bounded("download image", data, source.load(&self.client))
                        .await?
                        .map_err(|message| DeliveryError::Attachment {
                            url: url.clone(),
                            file: data.path.clone(),
                            message,
                        })?;

                    self.send(target, PayloadBody::File { name, data: bytes }).await?;
                    sent += 1;
                }

                Message::Text { content } => {
                    let options =
                        SplitOptions::default().with_max_length(self.config.max_message_length);
                    let fragments = split_message(content, &options).map_err(|source| {
                        DeliveryError::Split {
                            channel_id: data.channel_id.clone(),
                            file: data.path.clone(),
                            source,
                        }
                    })?;

                    if fragments.len() > 1 {
                        splits += 1;
                        self.reporter.warning(
                            "A message was split due to max length constraints",
                            Some(&data.path),
                        );
                    }

                    for fragment in fragments {
                        if fragment.trim().is_empty() {
                            continue;
                        }
                        self.send(target, PayloadBody::Content(fragment)).await?;
                        sent += 1;
                    }
                }

                Message::Break => {
                    let body = PayloadBody::Divider {
                        description: self.config.break_description.clone(),
                    };
                    self.send(target, body).await?;
                    sent += 1;
                }
            }
        }

        Ok((sent, splits))
    }

    async fn send(&self, target: &WebhookTarget<'_, S::Webhook>, body: PayloadBody) -> Result<()> {
        let payload = WebhookPayload {
            username: target.sender_name.clone(),
            avatar_url: target.sender_avatar.clone(),
            body,
        };

        self.remote(
            "execute webhook",
            target.data,
            self.session.execute_webhook(&target.webhook, payload),
        )
        .await
    }

    /// Await a remote call under the configured timeout, attaching context.
    async fn remote<T>(
        &self,
        operation: &'static str,
        data: &ChannelData,
        call: impl Future<Output = std::result::Result<T, PlatformError>>,
    ) -> Result<T> {
        self.bounded(operation, data, call)
            .await?
            .map_err(|e| DeliveryError::Platform {
                operation,
                channel_id: data.channel_id.clone(),
                file: data.path.clone(),
                message: e.to_string(),
            })
    }

    /// Await `call` under the configured timeout.
    async fn bounded<F: Future>(
        &self,
        operation: &'static str,
        data: &ChannelData,
        call: F,
    ) -> Result<F::Output> {
        let Some(limit) = self.config.request_timeout() else {
            return Ok(call.await);
        };

        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| DeliveryError::Timeout {
                operation,
                channel_id: data.channel_id.clone(),
                file: data.path.clone(),
                secs: limit.as_secs(),
            })
    }
}

/// Deliver to Discord with a bot token.
pub async fn deliver(
    token: &BotToken,
    data: &[ChannelData],
    config: &DeliveryConfig,
    reporter: Arc<dyn Reporter>,
) -> Result<DeliverySummary> {
    let session = crate::discord::DiscordSession::new(token, config.avatar_size);
    Deliverer::new(session, config.clone(), reporter)
        .deliver(data)
        .await
}
