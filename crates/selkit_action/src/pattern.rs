//! Pattern matching for action declarations.
//!
//! Patterns may carry state between searches (a global pattern resumes
//! where its previous match ended). The engine therefore resets a pattern
//! before and after every check so that no state leaks from one check to
//! the next, or from one invocation to the next.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{MatchRecord, PatternError};

/// Something that can search text for a match.
pub trait PatternMatcher: Send + Sync {
    /// Searches `text`, returning the first match from the current position.
    fn find(&self, text: &str) -> Result<Option<MatchRecord>, PatternError>;

    /// Clears any search position kept between calls.
    fn reset(&self) {}

    /// Searches `text` from the start, leaving no position behind.
    ///
    /// Stateful matchers shared across threads should override this so the
    /// whole search happens under one lock.
    fn find_isolated(&self, text: &str) -> Result<Option<MatchRecord>, PatternError> {
        self.reset();
        let result = self.find(text);
        self.reset();
        result
    }

    /// Human-readable source of the pattern.
    fn source(&self) -> &str;
}

fn record(captures: &Captures<'_>) -> MatchRecord {
    MatchRecord {
        full: captures
            .get(0)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        captures: captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect(),
    }
}

/// An already-compiled regular expression.
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
    global: bool,
    cursor: Mutex<usize>,
}

impl CompiledPattern {
    /// A stateless pattern; every search starts at the beginning.
    pub fn new(regex: Regex) -> Self {
        Self {
            regex,
            global: false,
            cursor: Mutex::new(0),
        }
    }

    /// A stateful pattern; each search resumes after the previous match and
    /// wraps back to the start once a search fails.
    pub fn global(regex: Regex) -> Self {
        Self {
            global: true,
            ..Self::new(regex)
        }
    }

    /// Byte offset the next search starts from.
    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }
}

impl PatternMatcher for CompiledPattern {
    fn find(&self, text: &str) -> Result<Option<MatchRecord>, PatternError> {
        if !self.global {
            return Ok(self.regex.captures(text).as_ref().map(record));
        }

        let mut cursor = self.cursor.lock();
        let start = *cursor;
        if start > text.len() || !text.is_char_boundary(start) {
            *cursor = 0;
            return Ok(None);
        }

        match self.regex.captures_at(text, start) {
            Some(captures) => {
                *cursor = captures.get(0).map_or(start, |m| m.end());
                Ok(Some(record(&captures)))
            }
            None => {
                *cursor = 0;
                Ok(None)
            }
        }
    }

    fn reset(&self) {
        *self.cursor.lock() = 0;
    }

    fn find_isolated(&self, text: &str) -> Result<Option<MatchRecord>, PatternError> {
        let mut cursor = self.cursor.lock();
        *cursor = 0;
        Ok(self.regex.captures(text).as_ref().map(record))
    }

    fn source(&self) -> &str {
        self.regex.as_str()
    }
}

/// A pattern given as source text, compiled on first use.
///
/// A malformed source is reported as a [`PatternError`] on every search.
pub struct SourcePattern {
    source: String,
    compiled: OnceLock<Result<Regex, PatternError>>,
}

impl SourcePattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    fn regex(&self) -> Result<&Regex, PatternError> {
        self.compiled
            .get_or_init(|| {
                Regex::new(&self.source).map_err(|e| PatternError::new(&self.source, e.to_string()))
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePattern")
            .field("source", &self.source)
            .finish()
    }
}

impl PatternMatcher for SourcePattern {
    fn find(&self, text: &str) -> Result<Option<MatchRecord>, PatternError> {
        Ok(self.regex()?.captures(text).as_ref().map(record))
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Shared handle to a pattern.
///
/// Deserializes from a source string.
#[derive(Clone)]
pub struct Pattern(Arc<dyn PatternMatcher>);

impl Pattern {
    /// A pattern compiled from `source` on first use.
    pub fn source(source: impl Into<String>) -> Self {
        Self(Arc::new(SourcePattern::new(source)))
    }

    pub fn compiled(regex: Regex) -> Self {
        Self(Arc::new(CompiledPattern::new(regex)))
    }

    pub fn global(regex: Regex) -> Self {
        Self(Arc::new(CompiledPattern::global(regex)))
    }

    pub fn from_matcher(matcher: Arc<dyn PatternMatcher>) -> Self {
        Self(matcher)
    }

    pub fn matcher(&self) -> &dyn PatternMatcher {
        self.0.as_ref()
    }

    /// One isolated check: reset, search, reset.
    pub fn check(&self, text: &str) -> Result<Option<MatchRecord>, PatternError> {
        self.0.find_isolated(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.0.source()).finish()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.source())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Pattern::source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn regex(s: &str) -> Regex {
        Regex::new(s).unwrap()
    }

    #[test]
    fn captures_groups_in_order() {
        let pattern = Pattern::source(r"(\d{4})-(\d{2})(-(\d{2}))?");
        let found = pattern.check("on 2024-05 we").unwrap().unwrap();

        assert_eq!(found.full, "2024-05");
        assert_eq!(
            found.captures,
            vec![Some("2024".to_string()), Some("05".to_string()), None, None]
        );
    }

    #[test]
    fn global_pattern_advances_between_raw_finds() {
        let pattern = CompiledPattern::global(regex(r"\d+"));

        assert_eq!(pattern.find("1 22 333").unwrap().unwrap().full, "1");
        assert_eq!(pattern.find("1 22 333").unwrap().unwrap().full, "22");
        assert_eq!(pattern.cursor(), 4);
        assert_eq!(pattern.find("1 22 333").unwrap().unwrap().full, "333");
        assert!(pattern.find("1 22 333").unwrap().is_none());
        assert_eq!(pattern.cursor(), 0);
    }

    #[test]
    fn check_isolates_global_state() {
        let pattern = Pattern::global(regex(r"\d+"));

        for _ in 0..3 {
            assert_eq!(pattern.check("7 8").unwrap().unwrap().full, "7");
        }
    }

    #[test]
    fn check_rewinds_cursor_left_by_raw_finds() {
        let compiled = Arc::new(CompiledPattern::global(regex(r"\d+")));
        let pattern = Pattern::from_matcher(compiled.clone());

        compiled.find("1 22").unwrap();
        assert_eq!(compiled.cursor(), 1);
        assert_eq!(pattern.check("1 22").unwrap().unwrap().full, "1");
        assert_eq!(compiled.cursor(), 0);
    }

    #[test]
    fn stale_cursor_beyond_text_does_not_panic() {
        let pattern = CompiledPattern::global(regex("b"));

        pattern.find("aaaaab").unwrap();
        assert!(pattern.find("b").unwrap().is_none());
        assert_eq!(pattern.find("b").unwrap().unwrap().full, "b");
    }

    #[test]
    fn malformed_source_is_an_error_every_time() {
        let pattern = Pattern::source("(unclosed");

        let first = pattern.check("anything").unwrap_err();
        let second = pattern.check("anything").unwrap_err();

        assert_eq!(first.pattern, "(unclosed");
        assert_eq!(first, second);
    }

    #[test]
    fn deserializes_from_string() {
        let pattern: Pattern = serde_json::from_str(r#""^#\\w+""#).unwrap();

        assert_eq!(pattern.matcher().source(), r"^#\w+");
        assert_eq!(serde_json::to_string(&pattern).unwrap(), r#""^#\\w+""#);
    }
}
