//! Length-bounded message splitting.
//!
//! Text longer than the limit is split on boundaries tried in priority
//! order: each boundary is applied only while some fragment is still too
//! long. Content is never truncated; if no boundary brings every fragment
//! under the limit the split fails.

use crate::error::SplitError;
use regex::Regex;
use serde_json::Value;

/// Default maximum fragment length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// A separator used to split text.
#[derive(Debug, Clone)]
pub enum Boundary {
    /// Split on a literal separator, discarding it.
    Literal(String),

    /// A regular expression. Used alone it splits like a literal; inside an
    /// ordered list every match is kept as a fragment.
    Pattern(Regex),
}

impl Boundary {
    /// Create a literal boundary.
    pub fn literal(separator: impl Into<String>) -> Self {
        Self::Literal(separator.into())
    }

    /// Split `text` on every occurrence of the boundary, discarding it.
    fn split(&self, text: &str) -> Vec<String> {
        match self {
            Self::Literal(separator) if separator.is_empty() => {
                text.chars().map(String::from).collect()
            }
            Self::Literal(separator) => text.split(separator.as_str()).map(String::from).collect(),
            Self::Pattern(pattern) => pattern.split(text).map(String::from).collect(),
        }
    }

    /// One escalation step of an ordered split. Literals split; patterns keep
    /// each match as a fragment.
    fn escalate(&self, text: &str) -> Vec<String> {
        match self {
            Self::Literal(_) => self.split(text),
            Self::Pattern(pattern) => pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}

/// The boundaries to split on.
#[derive(Debug, Clone)]
pub enum Boundaries {
    /// Split once on a single boundary.
    Single(Boundary),

    /// Try boundaries front to back, escalating only while needed.
    Ordered(Vec<Boundary>),
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::Single(Boundary::literal("\n"))
    }
}

/// Options controlling [`split_message`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Maximum characters per fragment.
    pub max_length: usize,

    /// Where text may be split.
    pub boundaries: Boundaries,

    /// Prepended to every fragment except the first.
    pub prepend: String,

    /// Appended to every fragment except the last.
    pub append: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            boundaries: Boundaries::default(),
            prepend: String::new(),
            append: String::new(),
        }
    }
}

impl SplitOptions {
    /// Set the maximum fragment length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Split on a single boundary.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundaries = Boundaries::Single(boundary);
        self
    }

    /// Split on an ordered list of boundaries.
    pub fn with_boundaries(mut self, boundaries: impl IntoIterator<Item = Boundary>) -> Self {
        self.boundaries = Boundaries::Ordered(boundaries.into_iter().collect());
        self
    }

    /// Set the text prepended to continuation fragments.
    pub fn with_prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend = prepend.into();
        self
    }

    /// Set the text appended to non-final fragments.
    pub fn with_append(mut self, append: impl Into<String>) -> Self {
        self.append = append.into();
        self
    }
}

/// Verify that `value` is a string.
///
/// Empty strings are rejected unless `allow_empty` is set.
pub fn verify_string(value: &Value, allow_empty: bool) -> Result<&str, SplitError> {
    match value {
        Value::String(s) if allow_empty || !s.is_empty() => Ok(s),
        other => Err(SplitError::InputType(other.to_string())),
    }
}

/// Split an untyped value, failing if it is not a string.
pub fn split_value(value: &Value, options: &SplitOptions) -> Result<Vec<String>, SplitError> {
    split_message(verify_string(value, true)?, options)
}

/// Split `text` into fragments of at most `options.max_length` characters.
///
/// Text that already fits is returned unchanged as a single fragment. Lengths
/// are counted in characters, and include `prepend`/`append` once applied.
pub fn split_message(text: &str, options: &SplitOptions) -> Result<Vec<String>, SplitError> {
    let max_length = options.max_length;
    if char_len(text) <= max_length {
        return Ok(vec![text.to_string()]);
    }

    let too_long = |fragment: &String| char_len(fragment) > max_length;

    let fragments = match &options.boundaries {
        Boundaries::Single(boundary) => boundary.split(text),
        Boundaries::Ordered(boundaries) => {
            let mut fragments = vec![text.to_string()];
            for boundary in boundaries {
                if !fragments.iter().any(too_long) {
                    break;
                }
                fragments = fragments
                    .iter()
                    .flat_map(|fragment| boundary.escalate(fragment))
                    .collect();
            }
            fragments
        }
    };

    let fragments = decorate(fragments, &options.prepend, &options.append);

    if let Some(length) = fragments.iter().map(|f| char_len(f)).filter(|&n| n > max_length).max() {
        return Err(SplitError::Oversize { length, max_length });
    }

    Ok(fragments)
}

fn decorate(fragments: Vec<String>, prepend: &str, append: &str) -> Vec<String> {
    if prepend.is_empty() && append.is_empty() {
        return fragments;
    }

    let last = fragments.len().saturating_sub(1);
    fragments
        .into_iter()
        .enumerate()
        .map(|(idx, fragment)| {
            let mut out = String::with_capacity(prepend.len() + fragment.len() + append.len());
            if idx > 0 {
                out.push_str(prepend);
            }
            out.push_str(&fragment);
            if idx < last {
                out.push_str(append);
            }
            out
        })
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(count: usize, width: usize) -> String {
        (0..count)
            .map(|i| {
                let c = char::from(b'a' + (i % 26) as u8);
                c.to_string().repeat(width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_short_text_is_identity() {
        let options = SplitOptions::default().with_prepend("> ").with_append("…");
        let out = split_message("hello\nworld", &options).unwrap();
        assert_eq!(out, vec!["hello\nworld".to_string()]);
    }

    #[test]
    fn test_split_on_newlines() {
        let text = lines(8, 500);
        let options = SplitOptions::default().with_max_length(1950);
        let out = split_message(&text, &options).unwrap();

        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|f| f.chars().count() <= 1950));
        assert_eq!(out.join("\n"), text);
    }

    #[test]
    fn test_unsplittable_text_is_oversize() {
        let text = "x".repeat(4000);
        let options = SplitOptions::default().with_max_length(1950);
        let err = split_message(&text, &options).unwrap_err();
        assert_eq!(
            err,
            SplitError::Oversize {
                length: 4000,
                max_length: 1950
            }
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let text = "é".repeat(10);
        let options = SplitOptions::default().with_max_length(10);
        assert_eq!(split_message(&text, &options).unwrap(), vec![text.clone()]);
    }

    #[test]
    fn test_later_boundary_unused_when_first_suffices() {
        let text = "aaaa bbbb\ncccc dddd";
        let options = SplitOptions::default()
            .with_max_length(10)
            .with_boundaries([Boundary::literal("\n"), Boundary::literal(" ")]);

        let out = split_message(text, &options).unwrap();
        assert_eq!(out, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_escalates_to_finer_boundary() {
        let text = "aaaa bbbb cccc\ndddd";
        let options = SplitOptions::default()
            .with_max_length(10)
            .with_boundaries([Boundary::literal("\n"), Boundary::literal(" ")]);

        let out = split_message(text, &options).unwrap();
        assert_eq!(out, vec!["aaaa", "bbbb", "cccc", "dddd"]);
    }

    #[test]
    fn test_ordered_boundaries_exhausted() {
        let text = format!("{}\nshort", "y".repeat(30));
        let options = SplitOptions::default()
            .with_max_length(20)
            .with_boundaries([Boundary::literal("\n"), Boundary::literal(" ")]);

        assert!(matches!(
            split_message(&text, &options),
            Err(SplitError::Oversize { length: 30, .. })
        ));
    }

    #[test]
    fn test_pattern_boundary_keeps_matches() {
        let text = "one. two. three.";
        let options = SplitOptions::default()
            .with_max_length(8)
            .with_boundaries([Boundary::Pattern(Regex::new(r"[^.]+\.").unwrap())]);

        let out = split_message(text, &options).unwrap();
        assert_eq!(out, vec!["one.", " two.", " three."]);
    }

    #[test]
    fn test_single_pattern_boundary_splits_on_matches() {
        let options = SplitOptions::default()
            .with_max_length(5)
            .with_boundary(Boundary::Pattern(Regex::new(r"\s+").unwrap()));

        let out = split_message("aaa bbb  ccc", &options).unwrap();
        assert_eq!(out, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_prepend_and_append() {
        let text = "aaaa\nbbbb\ncccc";
        let options = SplitOptions::default()
            .with_max_length(8)
            .with_prepend("> ")
            .with_append(" +");

        let out = split_message(text, &options).unwrap();
        assert_eq!(out, vec!["aaaa +", "> bbbb +", "> cccc"]);
    }

    #[test]
    fn test_decoration_counts_toward_limit() {
        let text = "aaaaaaaa\nbbbbbbbb";
        let options = SplitOptions::default()
            .with_max_length(8)
            .with_prepend("> ");

        assert!(matches!(
            split_message(text, &options),
            Err(SplitError::Oversize { length: 10, .. })
        ));
    }

    #[test]
    fn test_verify_string() {
        assert_eq!(verify_string(&Value::from("hi"), false).unwrap(), "hi");
        assert_eq!(verify_string(&Value::from(""), true).unwrap(), "");
        assert!(matches!(
            verify_string(&Value::from(""), false),
            Err(SplitError::InputType(_))
        ));
        assert!(matches!(
            split_value(&Value::from(42), &SplitOptions::default()),
            Err(SplitError::InputType(s)) if s == "42"
        ));
    }
}
