//! Classified input for one invocation.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::Context;

/// Kinds of entity a classifier can detect in the selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// `http` or `https` URL.
    WebUrl,
    /// URL with any other scheme.
    OtherUrl,
    Email,
    Path,
}

/// One detected entity and where it sits in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub text: String,
    /// Byte range within [`ClassifiedInput::text`].
    pub range: Range<usize>,
}

/// Result of a successful pattern match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// The full matched text.
    pub full: String,
    /// Capture groups in order; `None` for groups that did not participate.
    pub captures: Vec<Option<String>>,
}

impl MatchRecord {
    pub fn new(full: impl Into<String>) -> Self {
        Self {
            full: full.into(),
            captures: Vec::new(),
        }
    }

    /// Group `index`, where 0 is the full match.
    pub fn group(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.full),
            n => self.captures.get(n - 1)?.as_deref(),
        }
    }
}

/// Everything known about the selected text.
///
/// Immutable for the duration of one resolution pass. Actions that matched
/// a pattern receive a copy with [`matched`](Self::matched) filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifiedInput {
    pub text: String,
    pub html: Option<String>,
    pub rtf: Option<String>,
    pub markdown: Option<String>,
    pub data: BTreeMap<EntityKind, Vec<DetectedEntity>>,
    pub matched: Option<MatchRecord>,
}

impl ClassifiedInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Records a detected entity.
    pub fn with_entity(mut self, kind: EntityKind, text: impl Into<String>, range: Range<usize>) -> Self {
        self.data.entry(kind).or_default().push(DetectedEntity {
            text: text.into(),
            range,
        });
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_rtf(mut self, rtf: impl Into<String>) -> Self {
        self.rtf = Some(rtf.into());
        self
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    pub fn entities(&self, kind: EntityKind) -> &[DetectedEntity] {
        self.data.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, kind: EntityKind) -> bool {
        !self.entities(kind).is_empty()
    }

    /// A copy of this input carrying `record` as its match.
    pub fn with_match(&self, record: MatchRecord) -> Self {
        Self {
            matched: Some(record),
            ..self.clone()
        }
    }
}

/// Turns raw selected text into a [`ClassifiedInput`].
pub trait InputClassifier: Send + Sync {
    fn classify(&self, text: &str, context: &Context) -> ClassifiedInput;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn match_groups_are_one_based() {
        let record = MatchRecord {
            full: "2024-01".to_string(),
            captures: vec![Some("2024".to_string()), None],
        };

        assert_eq!(record.group(0), Some("2024-01"));
        assert_eq!(record.group(1), Some("2024"));
        assert_eq!(record.group(2), None);
        assert_eq!(record.group(3), None);
    }

    #[test]
    fn entities_default_to_empty() {
        let input = ClassifiedInput::new("hello").with_entity(EntityKind::Email, "a@b.c", 0..5);

        assert!(input.has(EntityKind::Email));
        assert!(!input.has(EntityKind::WebUrl));
        assert!(input.entities(EntityKind::Path).is_empty());
    }

    #[test]
    fn with_match_leaves_original_untouched() {
        let input = ClassifiedInput::new("abc");
        let matched = input.with_match(MatchRecord::new("b"));

        assert!(input.matched.is_none());
        assert_eq!(matched.matched, Some(MatchRecord::new("b")));
        assert_eq!(matched.text, "abc");
    }
}
