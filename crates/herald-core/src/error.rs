//! Error types for Herald core.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// An error that can be surfaced as a runner annotation.
///
/// `failure` is the short summary shown as the job failure, `annotation`
/// the longer message attached to `file`.
pub trait Annotated: std::error::Error {
    /// Short failure summary.
    fn failure(&self) -> &'static str;

    /// Longer annotation text.
    fn annotation(&self) -> String {
        self.to_string()
    }

    /// Offending source file, if any.
    fn file(&self) -> Option<&Path>;
}

/// Template parsing errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("\"{}\" does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Frontmatter is missing")]
    MissingFrontmatter(PathBuf),

    #[error("Frontmatter is not valid YAML: {message}")]
    Frontmatter { path: PathBuf, message: String },

    #[error("Frontmatter must be a mapping of keys to values")]
    MalformedFrontmatter(PathBuf),
}

impl TemplateError {
    /// Path of the template that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path)
            | Self::MissingFrontmatter(path)
            | Self::MalformedFrontmatter(path) => path,
            Self::Io { path, .. } | Self::Frontmatter { path, .. } => path,
        }
    }
}

impl Annotated for TemplateError {
    fn failure(&self) -> &'static str {
        "Failed to parse template!"
    }

    fn file(&self) -> Option<&Path> {
        Some(self.path())
    }
}

/// Front-matter key validation errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Frontmatter key `{key}` is missing!")]
    Missing { path: PathBuf, key: &'static str },

    #[error("Frontmatter key `{key}` must be a string!")]
    NotString { path: PathBuf, key: &'static str },
}

impl Annotated for MetadataError {
    fn failure(&self) -> &'static str {
        "Failed to parse template!"
    }

    fn file(&self) -> Option<&Path> {
        match self {
            Self::Missing { path, .. } | Self::NotString { path, .. } => Some(path),
        }
    }
}

/// Message splitting errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("Expected a string, got {0} instead.")]
    InputType(String),

    #[error("SPLIT_MAX_LEN: a fragment of {length} characters exceeds the limit of {max_length}")]
    Oversize { length: usize, max_length: usize },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON5 parse error: {0}")]
    Json5(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
