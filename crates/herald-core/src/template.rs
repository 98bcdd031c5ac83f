//! Template parsing.
//!
//! A template is a YAML front-matter block followed by zero or more content
//! segments, all separated by `---`. Each segment becomes exactly one
//! [`Message`], classified by the first matching rule in [`CLASSIFIERS`].

use crate::error::TemplateError;
use crate::message::{Message, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Segment delimiter.
pub const DELIMITER: &str = "---";

/// Token that marks a divider segment.
pub const BREAK_TOKEN: &str = "::break";

/// Glyph that replaces `* ` and `- ` list markers.
pub const BULLET: &str = "• ";

static IMAGE_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[(.*)\]\((.+)\)$").expect("image pattern is valid"));

static BULLET_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[*-] ").expect("bullet pattern is valid"));

static REMOTE_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern is valid"));

/// A classification stage. Returns `None` to pass the segment on.
type Classifier = fn(&str, &Path) -> Option<Message>;

/// Classification stages in priority order. The last stage is total.
const CLASSIFIERS: &[Classifier] = &[classify_break, classify_image, classify_text];

/// Read and parse a template file.
pub async fn parse_template(path: impl AsRef<Path>) -> Result<ParseResult, TemplateError> {
    let path = path.as_ref();

    if tokio::fs::metadata(path).await.is_err() {
        return Err(TemplateError::NotFound(path.to_path_buf()));
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    parse_template_str(path, &text)
}

/// Parse template text that was read from `path`.
///
/// `path` is used for the result's file name and to resolve relative image
/// URLs; it is not read.
pub fn parse_template_str(path: impl AsRef<Path>, text: &str) -> Result<ParseResult, TemplateError> {
    let path = path.as_ref();

    let mut segments = text
        .split(DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    let frontmatter = segments
        .next()
        .ok_or_else(|| TemplateError::MissingFrontmatter(path.to_path_buf()))?;
    let metadata = parse_frontmatter(path, frontmatter)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let messages: Vec<Message> = segments
        .map(|segment| classify(segment, base_dir))
        .collect();

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(
        file = %path.display(),
        count = messages.len(),
        "Parsed template"
    );

    Ok(ParseResult {
        path: path.to_path_buf(),
        file_name,
        metadata,
        messages,
    })
}

fn parse_frontmatter(path: &Path, raw: &str) -> Result<BTreeMap<String, Value>, TemplateError> {
    let document: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| TemplateError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let serde_yaml::Value::Mapping(mapping) = document else {
        return Err(TemplateError::MalformedFrontmatter(path.to_path_buf()));
    };

    let mut metadata = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(key) => key,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => return Err(TemplateError::MalformedFrontmatter(path.to_path_buf())),
        };

        let value = serde_json::to_value(value).map_err(|e| TemplateError::Frontmatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        metadata.insert(key, value);
    }

    Ok(metadata)
}

fn classify(segment: &str, base_dir: &Path) -> Message {
    CLASSIFIERS
        .iter()
        .find_map(|stage| stage(segment, base_dir))
        .unwrap_or_else(|| Message::Text {
            content: segment.to_string(),
        })
}

fn classify_break(segment: &str, _base_dir: &Path) -> Option<Message> {
    (segment == BREAK_TOKEN).then_some(Message::Break)
}

fn classify_image(segment: &str, base_dir: &Path) -> Option<Message> {
    let captures = IMAGE_RX.captures(segment)?;
    let caption = captures.get(1).map_or("", |m| m.as_str());
    let url = captures.get(2).map_or("", |m| m.as_str());

    let url = if REMOTE_RX.is_match(url) {
        url.to_string()
    } else {
        join_relative(base_dir, url).to_string_lossy().into_owned()
    };

    Some(Message::Image {
        caption: caption.to_string(),
        url,
    })
}

fn classify_text(segment: &str, _base_dir: &Path) -> Option<Message> {
    Some(Message::Text {
        content: normalize_bullets(segment),
    })
}

/// Rewrite `* ` and `- ` list markers at line starts to a bullet glyph.
pub fn normalize_bullets(segment: &str) -> String {
    BULLET_RX.replace_all(segment, BULLET).into_owned()
}

/// Join `relative` onto `base` lexically, folding `.` and `..` components.
///
/// A leading root in `relative` is dropped when `base` is non-empty.
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in base.components().chain(Path::new(relative).components()) {
        match component {
            Component::CurDir => {}
            Component::RootDir if !parts.is_empty() => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}
