//! A regex-based input classifier.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use selkit_action::{ClassifiedInput, Context, EntityKind, InputClassifier};

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b([A-Za-z][A-Za-z0-9+.\-]*)://[^\s<>"']+"#).expect("Invalid URL pattern")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b")
        .expect("Invalid email pattern")
});

static PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:~/|/)[^\n\x00]*$").expect("Invalid path pattern"));

/// Punctuation that usually ends a sentence rather than a URL.
const URL_TRAILERS: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Detects URLs, email addresses and file paths with regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicClassifier;

impl BasicClassifier {
    pub fn new() -> Self {
        Self
    }

    fn urls(text: &str) -> impl Iterator<Item = (EntityKind, Range<usize>)> + '_ {
        URL.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            let scheme = caps.get(1)?.as_str().to_ascii_lowercase();
            let trimmed = whole.as_str().trim_end_matches(URL_TRAILERS);
            let kind = if scheme == "http" || scheme == "https" {
                EntityKind::WebUrl
            } else {
                EntityKind::OtherUrl
            };
            Some((kind, whole.start()..whole.start() + trimmed.len()))
        })
    }

    fn path(text: &str) -> Option<Range<usize>> {
        let trimmed = text.trim();
        if trimmed.contains("://") || !PATH.is_match(trimmed) {
            return None;
        }
        let start = text.len() - text.trim_start().len();
        Some(start..start + trimmed.len())
    }
}

impl InputClassifier for BasicClassifier {
    fn classify(&self, text: &str, _context: &Context) -> ClassifiedInput {
        let mut input = ClassifiedInput::new(text);

        for (kind, range) in Self::urls(text) {
            input = input.with_entity(kind, &text[range.clone()], range);
        }

        let email_ranges: Vec<Range<usize>> = EMAIL.find_iter(text).map(|m| m.range()).collect();
        for range in email_ranges {
            let inside_url = input
                .entities(EntityKind::WebUrl)
                .iter()
                .chain(input.entities(EntityKind::OtherUrl))
                .any(|url| url.range.start <= range.start && range.end <= url.range.end);
            if !inside_url {
                input = input.with_entity(EntityKind::Email, &text[range.clone()], range);
            }
        }

        if let Some(range) = Self::path(text) {
            input = input.with_entity(EntityKind::Path, &text[range.clone()], range);
        }

        input
    }
}
