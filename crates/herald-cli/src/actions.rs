//! GitHub Actions workflow-command reporting.

use herald_core::{Reporter, TracingReporter};
use std::path::Path;
use std::sync::Arc;

/// Reporter that writes workflow commands to stdout so the runner renders
/// log groups and file annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionsReporter;

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str, file: Option<&Path>) {
        println!("{}", command("warning", file, message));
    }

    fn error(&self, message: &str, file: Option<&Path>) {
        println!("{}", command("error", file, message));
    }

    fn start_group(&self, name: &str) {
        println!("{}", command("group", None, name));
    }

    fn end_group(&self) {
        println!("::endgroup::");
    }
}

/// Whether we are running inside a GitHub Actions job.
pub fn in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map_or(false, |v| v == "true")
}

/// Pick the reporter for the current environment.
pub fn reporter() -> Arc<dyn Reporter> {
    if in_actions() {
        Arc::new(ActionsReporter)
    } else {
        Arc::new(TracingReporter)
    }
}

/// Format a workflow command line.
pub fn command(name: &str, file: Option<&Path>, message: &str) -> String {
    match file {
        Some(file) => format!(
            "::{} file={}::{}",
            name,
            escape_property(&file.to_string_lossy()),
            escape_data(message)
        ),
        None => format!("::{}::{}", name, escape_data(message)),
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
