//! Image attachments for `Image` messages.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A remote `http(s)` URL.
    Remote(Url),

    /// A local file.
    Local(PathBuf),
}

impl ImageSource {
    /// Classify a parsed image URL.
    pub fn parse(url: &str) -> Self {
        match Url::parse(url) {
            Ok(remote) if matches!(remote.scheme(), "http" | "https") => Self::Remote(remote),
            _ => Self::Local(PathBuf::from(url)),
        }
    }

    /// File extension including the leading dot, or an empty string.
    ///
    /// For remote URLs the query string and fragment are ignored.
    pub fn extension(&self) -> String {
        let path = match self {
            Self::Remote(url) => Path::new(url.path()).to_path_buf(),
            Self::Local(path) => path.clone(),
        };

        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// MIME type guessed from the extension.
    pub fn mime_type(&self) -> String {
        let guess = match self {
            Self::Remote(url) => mime_guess::from_path(url.path()),
            Self::Local(path) => mime_guess::from_path(path),
        };
        guess.first_or_octet_stream().to_string()
    }

    /// Load the image bytes.
    pub async fn load(&self, client: &reqwest::Client) -> Result<Bytes, String> {
        match self {
            Self::Remote(url) => {
                debug!(url = %url, "Downloading image");
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| e.to_string())?;
                response.bytes().await.map_err(|e| e.to_string())
            }
            Self::Local(path) => {
                debug!(path = %path.display(), "Reading image");
                tokio::fs::read(path)
                    .await
                    .map(Bytes::from)
                    .map_err(|e| e.to_string())
            }
        }
    }
}

/// Attachment file name: the caption followed by the source's extension.
///
/// An empty caption falls back to `image`.
pub fn attachment_name(caption: &str, source: &ImageSource) -> String {
    let stem = caption.trim();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{}{}", stem, source.extension())
}
