//! Delivery error types.

use herald_core::error::{Annotated, SplitError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while delivering templates.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The platform rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The channel does not exist or is not visible to the bot.
    #[error("Channel ID `{channel_id}` could not be found!")]
    ChannelNotFound { channel_id: String, file: PathBuf },

    /// The channel cannot hold text messages.
    #[error("Channel ID `{channel_id}` is not a text channel!")]
    WrongChannelType { channel_id: String, file: PathBuf },

    /// A text channel without a parent server.
    #[error("Channel ID `{channel_id}` does not belong to a server!")]
    MissingGuild { channel_id: String, file: PathBuf },

    /// @everyone may already post in the channel.
    #[error("Channel ID `{channel_id}` has send messages on for @everyone")]
    ChannelTooOpen { channel_id: String, file: PathBuf },

    /// A text message could not be brought under the length limit.
    #[error("A message for channel `{channel_id}` could not be split: {source}")]
    Split {
        channel_id: String,
        file: PathBuf,
        #[source]
        source: SplitError,
    },

    /// An image could not be loaded.
    #[error("Image `{url}` could not be loaded: {message}")]
    Attachment {
        url: String,
        file: PathBuf,
        message: String,
    },

    /// A remote call failed.
    #[error("Discord request `{operation}` for channel `{channel_id}` failed: {message}")]
    Platform {
        operation: &'static str,
        channel_id: String,
        file: PathBuf,
        message: String,
    },

    /// A remote call did not finish in time.
    #[error("Discord request `{operation}` for channel `{channel_id}` timed out after {secs}s")]
    Timeout {
        operation: &'static str,
        channel_id: String,
        file: PathBuf,
        secs: u64,
    },
}

impl DeliveryError {
    /// Channel the error concerns, if any.
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            Self::Auth(_) => None,
            Self::ChannelNotFound { channel_id, .. }
            | Self::WrongChannelType { channel_id, .. }
            | Self::MissingGuild { channel_id, .. }
            | Self::ChannelTooOpen { channel_id, .. }
            | Self::Split { channel_id, .. }
            | Self::Platform { channel_id, .. }
            | Self::Timeout { channel_id, .. } => Some(channel_id),
            Self::Attachment { .. } => None,
        }
    }
}

impl Annotated for DeliveryError {
    fn failure(&self) -> &'static str {
        match self {
            Self::Auth(_) => "Failed to log in!",
            Self::ChannelNotFound { .. }
            | Self::WrongChannelType { .. }
            | Self::MissingGuild { .. } => "Failed to resolve channel!",
            Self::ChannelTooOpen { .. } => "Channel permissions are too open!",
            Self::Split { .. } => "Failed to split message!",
            Self::Attachment { .. } => "Failed to send image!",
            Self::Platform { .. } | Self::Timeout { .. } => "Failed to deliver messages!",
        }
    }

    fn file(&self) -> Option<&Path> {
        match self {
            Self::Auth(_) => None,
            Self::ChannelNotFound { file, .. }
            | Self::WrongChannelType { file, .. }
            | Self::MissingGuild { file, .. }
            | Self::ChannelTooOpen { file, .. }
            | Self::Split { file, .. }
            | Self::Attachment { file, .. }
            | Self::Platform { file, .. }
            | Self::Timeout { file, .. } => Some(file),
        }
    }
}
