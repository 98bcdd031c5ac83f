//! Bot token handling.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A bot token that is redacted when printed and zeroed on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct BotToken {
    inner: String,
}

impl BotToken {
    /// Wrap a raw token, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        let mut value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            let owned = trimmed.to_string();
            value.zeroize();
            value = owned;
        }
        Self { inner: value }
    }

    /// Expose the raw token. Only the platform session should need this.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// Never print tokens
impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for BotToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for BotToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_redacted() {
        let token = BotToken::new("abc.def.ghi");
        assert_eq!(format!("{:?}", token), "[REDACTED]");
        assert_eq!(format!("{}", token), "[REDACTED]");
    }

    #[test]
    fn test_token_trimmed() {
        let token = BotToken::from("  abc.def\n");
        assert_eq!(token.expose_secret(), "abc.def");
        assert!(!token.is_empty());
        assert!(BotToken::new("   ").is_empty());
    }
}
