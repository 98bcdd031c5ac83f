//! Configuration loading.

use super::HeraldConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Platform hard limit on message content length.
pub const PLATFORM_MAX_MESSAGE_LENGTH: usize = 2000;

impl HeraldConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let delivery = &self.delivery;

        if delivery.max_message_length == 0 {
            errors.push("delivery.maxMessageLength must be greater than 0".to_string());
        }
        if delivery.max_message_length > PLATFORM_MAX_MESSAGE_LENGTH {
            errors.push(format!(
                "delivery.maxMessageLength {} exceeds the platform limit of {}",
                delivery.max_message_length, PLATFORM_MAX_MESSAGE_LENGTH
            ));
        }

        if !(1..=100).contains(&delivery.purge_limit) {
            errors.push(format!(
                "delivery.purgeLimit must be 1-100, got {}",
                delivery.purge_limit
            ));
        }

        if delivery.webhook_name.trim().is_empty() {
            errors.push("delivery.webhookName must not be empty".to_string());
        }

        let size = delivery.avatar_size;
        if !size.is_power_of_two() || !(16..=4096).contains(&size) {
            errors.push(format!(
                "delivery.avatarSize must be a power of two between 16 and 4096, got {}",
                size
            ));
        }

        if delivery.break_description.is_empty() {
            errors.push("delivery.breakDescription must not be empty".to_string());
        }

        let extension = &self.templates.extension;
        if extension.is_empty() || extension.starts_with('.') {
            errors.push(format!(
                "templates.extension must be a bare extension like 'md', got '{}'",
                extension
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
