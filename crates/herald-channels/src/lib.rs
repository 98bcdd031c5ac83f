//! Webhook delivery for Herald.
//!
//! This crate resolves template targets to Discord channels, hides them while
//! their content is replaced, posts the parsed messages through a webhook,
//! and restores the channel's visibility afterwards.

pub mod attachment;
pub mod discord;
pub mod error;
pub mod orchestrator;
pub mod permissions;
pub mod traits;

pub use discord::DiscordSession;
pub use error::DeliveryError;
pub use orchestrator::{deliver, Deliverer, DeliverySummary};
pub use traits::{
    ChannelKind, ChannelSnapshot, GuildSnapshot, PayloadBody, PlatformError, PlatformSession,
    Visibility, WebhookPayload,
};

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;
