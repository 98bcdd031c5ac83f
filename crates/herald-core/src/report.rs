//! Progress and diagnostic reporting.
//!
//! Delivery emits human-readable notices and non-fatal warnings through a
//! [`Reporter`] rather than returning them, so the binary can route them to
//! the automation runner while tests record them.

use std::path::Path;
use tracing::{error, info, warn};

/// Sink for progress notices and diagnostics.
pub trait Reporter: Send + Sync {
    /// A progress notice.
    fn info(&self, message: &str);

    /// A non-fatal warning, optionally tied to a source file.
    fn warning(&self, message: &str, file: Option<&Path>);

    /// An error annotation, optionally tied to a source file.
    fn error(&self, message: &str, file: Option<&Path>);

    /// Open a named group of output.
    fn start_group(&self, _name: &str) {}

    /// Close the current group.
    fn end_group(&self) {}
}

/// Reporter that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str, file: Option<&Path>) {
        match file {
            Some(file) => warn!(file = %file.display(), "{}", message),
            None => warn!("{}", message),
        }
    }

    fn error(&self, message: &str, file: Option<&Path>) {
        match file {
            Some(file) => error!(file = %file.display(), "{}", message),
            None => error!("{}", message),
        }
    }

    fn start_group(&self, name: &str) {
        info!("== {} ==", name);
    }
}
