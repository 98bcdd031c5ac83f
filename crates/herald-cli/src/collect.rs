//! Template discovery and metadata validation.

use futures::future::try_join_all;
use herald_core::error::{Annotated, MetadataError, TemplateError};
use herald_core::{parse_template, ChannelData, Reporter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised before delivery starts.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Input 'content' must be a directory")]
    NotDirectory(PathBuf),

    #[error("Failed to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl Annotated for CollectError {
    fn failure(&self) -> &'static str {
        match self {
            Self::NotDirectory(_) => "Input 'content' must be a directory",
            Self::Io { .. } => "Failed to read templates!",
            Self::Template(e) => e.failure(),
            Self::Metadata(e) => e.failure(),
        }
    }

    fn annotation(&self) -> String {
        match self {
            Self::Template(e) => e.annotation(),
            Self::Metadata(e) => e.annotation(),
            other => other.to_string(),
        }
    }

    fn file(&self) -> Option<&Path> {
        match self {
            Self::NotDirectory(path) | Self::Io { path, .. } => Some(path),
            Self::Template(e) => e.file(),
            Self::Metadata(e) => e.file(),
        }
    }
}

/// List template files in `dir`, sorted by name.
///
/// Only regular files whose name ends with `.{extension}` (any case) are
/// returned.
pub async fn template_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CollectError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(CollectError::NotDirectory(dir.to_path_buf())),
    }

    let io_err = |source: std::io::Error| CollectError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let suffix = format!(".{}", extension.to_lowercase());
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.ends_with(&suffix) {
            continue;
        }

        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => paths.push(path),
            _ => debug!(path = %path.display(), "Skipping non-file entry"),
        }
    }

    paths.sort();
    Ok(paths)
}

/// Parse and validate every template in `dir`.
///
/// Files are parsed concurrently; the result keeps directory order. An empty
/// directory is reported as a warning and yields no targets.
pub async fn collect(
    dir: &Path,
    extension: &str,
    reporter: &dyn Reporter,
) -> Result<Vec<ChannelData>, CollectError> {
    let paths = template_paths(dir, extension).await?;
    if paths.is_empty() {
        reporter.warning(
            "No template files were found in the specified directory",
            None,
        );
        return Ok(Vec::new());
    }

    let parsed = try_join_all(paths.iter().map(parse_template)).await?;

    let mut data = Vec::with_capacity(parsed.len());
    for result in parsed {
        let entry = ChannelData::from_parse_result(result)?;
        reporter.info(&format!("Successfully parsed `{}`", entry.path.display()));
        data.push(entry);
    }

    Ok(data)
}
