//! # herald-core
//!
//! Core types, template parsing, and message splitting for Herald.
//!
//! This crate holds everything that does not talk to the chat platform:
//!
//! - **Templates**: front-matter extraction and segment classification
//! - **Splitting**: boundary-driven splitting of long text under a length limit
//! - **Configuration**: delivery tuning loaded from JSON5
//! - **Reporting**: the progress/warning surface used by delivery and the CLI

pub mod config;
pub mod error;
pub mod message;
pub mod report;
pub mod secret;
pub mod split;
pub mod template;

// Re-exports for convenience
pub use config::HeraldConfig;
pub use error::{Annotated, ConfigError, MetadataError, SplitError, TemplateError};
pub use message::{ChannelData, Message, ParseResult};
pub use report::{Reporter, TracingReporter};
pub use secret::BotToken;
pub use split::{split_message, verify_string, Boundaries, Boundary, SplitOptions};
pub use template::{parse_template, parse_template_str};
