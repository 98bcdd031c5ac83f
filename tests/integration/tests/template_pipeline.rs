//! Template collection integration tests.
//!
//! These tests lay out template directories on disk and run them through
//! collection, parsing, and metadata validation.

use herald_cli::collect::{collect, CollectError};
use herald_core::error::Annotated;
use herald_core::{Message, TracingReporter};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn test_collects_in_directory_order() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "02-rules.md",
        "---\nchannel: \"222\"\n---\n* Be kind\n- No spam\n---\n::break",
    );
    write(
        dir.path(),
        "01-welcome.md",
        "---\nchannel: \"111\"\nsenderName: Herald\n---\nHello world",
    );
    write(dir.path(), "README.txt", "not a template");

    let data = collect(dir.path(), "md", &TracingReporter).await.unwrap();
    assert_eq!(data.len(), 2);

    assert_eq!(data[0].file_name, "01-welcome.md");
    assert_eq!(data[0].channel_id, "111");
    assert_eq!(data[0].sender_name.as_deref(), Some("Herald"));
    assert_eq!(
        data[0].messages,
        vec![Message::Text {
            content: "Hello world".into()
        }]
    );

    assert_eq!(data[1].channel_id, "222");
    assert_eq!(
        data[1].messages,
        vec![
            Message::Text {
                content: "• Be kind\n• No spam".into()
            },
            Message::Break,
        ]
    );
}

#[tokio::test]
async fn test_relative_image_resolves_against_template_dir() {
    let root = TempDir::new().unwrap();
    let templates = root.path().join("templates");
    std::fs::create_dir(&templates).unwrap();
    write(&templates, "a.md", "---\nchannel: \"1\"\n---\n![cat](./cat.png)");

    let data = collect(&templates, "md", &TracingReporter).await.unwrap();
    assert_eq!(
        data[0].messages,
        vec![Message::Image {
            caption: "cat".into(),
            url: templates.join("cat.png").to_string_lossy().into_owned(),
        }]
    );
}

#[tokio::test]
async fn test_remote_image_is_unchanged() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.md",
        "---\nchannel: \"1\"\n---\n![logo](https://example.com/logo.png)",
    );

    let data = collect(dir.path(), "md", &TracingReporter).await.unwrap();
    assert_eq!(
        data[0].messages,
        vec![Message::Image {
            caption: "logo".into(),
            url: "https://example.com/logo.png".into(),
        }]
    );
}

#[tokio::test]
async fn test_numeric_channel_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", "---\nchannel: 123\n---\nhi");

    let err = collect(dir.path(), "md", &TracingReporter).await.unwrap_err();
    assert!(matches!(err, CollectError::Metadata(_)));
    assert_eq!(err.failure(), "Failed to parse template!");
    assert_eq!(err.annotation(), "Frontmatter key `channel` must be a string!");
    assert_eq!(err.file(), Some(dir.path().join("a.md").as_path()));
}

#[tokio::test]
async fn test_mistyped_sender_image_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.md",
        "---\nchannel: \"1\"\nsenderImage: [a, b]\n---\nhi",
    );

    let err = collect(dir.path(), "md", &TracingReporter).await.unwrap_err();
    assert_eq!(
        err.annotation(),
        "Frontmatter key `senderImage` must be a string!"
    );
}

#[tokio::test]
async fn test_template_without_frontmatter_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty.md", "");

    let err = collect(dir.path(), "md", &TracingReporter).await.unwrap_err();
    assert!(matches!(err, CollectError::Template(_)));
    assert_eq!(err.annotation(), "Frontmatter is missing");
}

#[tokio::test]
async fn test_frontmatter_only_template_has_no_messages() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", "---\nchannel: \"1\"\n---\n");

    let data = collect(dir.path(), "md", &TracingReporter).await.unwrap();
    assert!(data[0].messages.is_empty());
}
