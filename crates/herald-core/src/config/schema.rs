//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main Herald configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// Delivery tuning.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Template discovery.
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryConfig {
    /// Maximum characters per text fragment. Kept below the platform's
    /// 2000 character hard limit.
    pub max_message_length: usize,

    /// Number of most recent messages purged from each channel.
    pub purge_limit: u8,

    /// Name given to a webhook when the channel has none.
    pub webhook_name: String,

    /// Resolution of the guild icon used as the default avatar.
    pub avatar_size: u16,

    /// Embed description sent for a break.
    pub break_description: String,

    /// Timeout for each remote call, in seconds. Zero disables it.
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_message_length: 1950,
            purge_limit: 100,
            webhook_name: "Welcome".to_string(),
            avatar_size: 2048,
            break_description: "-".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl DeliveryConfig {
    /// Per-call timeout, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Template discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplatesConfig {
    /// File extension of template files, without the dot.
    pub extension: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
        }
    }
}
