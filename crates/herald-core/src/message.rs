//! Parsed template types.

use crate::error::MetadataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single message classified from a template segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Plain text content.
    Text { content: String },

    /// An image sent as a file attachment.
    ///
    /// `url` is either an absolute `http(s)://` reference or a path already
    /// joined onto the template's directory.
    Image { caption: String, url: String },

    /// A visual divider.
    Break,
}

impl Message {
    /// Short lowercase name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Break => "break",
        }
    }
}

/// The result of parsing one template file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Path the template was read from.
    pub path: PathBuf,

    /// Base name of `path`.
    pub file_name: String,

    /// Free-form front-matter keys.
    pub metadata: BTreeMap<String, Value>,

    /// Messages in source order.
    pub messages: Vec<Message>,
}

/// Validated delivery input for one template.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelData {
    pub path: PathBuf,
    pub file_name: String,
    pub channel_id: String,
    pub messages: Vec<Message>,
    pub sender_name: Option<String>,
    pub sender_image: Option<String>,
}

impl ChannelData {
    /// Validate a parse result's front-matter and build delivery input.
    ///
    /// `channel` is required and must be a string; `senderName` and
    /// `senderImage` are optional but must be strings when present.
    pub fn from_parse_result(result: ParseResult) -> Result<Self, MetadataError> {
        let ParseResult {
            path,
            file_name,
            metadata,
            messages,
        } = result;

        let channel_id = match metadata.get("channel") {
            None | Some(Value::Null) => {
                return Err(MetadataError::Missing {
                    path,
                    key: "channel",
                })
            }
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(MetadataError::NotString {
                    path,
                    key: "channel",
                })
            }
        };

        let sender_name = optional_string(&metadata, "senderName", &path)?;
        let sender_image = optional_string(&metadata, "senderImage", &path)?;

        Ok(Self {
            path,
            file_name,
            channel_id,
            messages,
            sender_name,
            sender_image,
        })
    }
}

fn optional_string(
    metadata: &BTreeMap<String, Value>,
    key: &'static str,
    path: &Path,
) -> Result<Option<String>, MetadataError> {
    match metadata.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(MetadataError::NotString {
            path: path.to_path_buf(),
            key,
        }),
    }
}
