//! Requirement tokens.
//!
//! A requirement is a predicate over the input, context and option values.
//! Tokens are written as plain strings (`"url"`, `"!paste"`,
//! `"option-mode=fast"`) and validated when parsed: an unknown token is an
//! error, never silently ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ActionError, ClassifiedInput, Context, EntityKind, OptionValues};

/// Requirements applied when neither the action nor its set declares any.
pub const DEFAULT_REQUIREMENTS: &[RequirementToken] = &[RequirementToken {
    requirement: Requirement::Text,
    negated: false,
}];

const OPTION_PREFIX: &str = "option-";

/// One predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Some text is selected.
    Text,
    /// The host can copy the selection.
    Copy,
    /// The host can cut the selection.
    Cut,
    /// The host can paste over the selection.
    Paste,
    /// The target accepts formatted text.
    Formatting,
    /// At least one web URL was detected.
    Url,
    /// At least one email address was detected.
    Email,
    /// At least one file path was detected.
    Path,
    /// An HTML rendition of the selection exists.
    Html,
    /// An RTF rendition of the selection exists.
    Rtf,
    /// A Markdown rendition of the selection exists.
    Markdown,
    /// The option `key` currently has `value`.
    Option { key: String, value: String },
}

impl Requirement {
    /// Whether this predicate holds.
    pub fn holds(&self, input: &ClassifiedInput, context: &Context, options: &OptionValues) -> bool {
        let capabilities = &context.capabilities;
        match self {
            Self::Text => !input.text.is_empty(),
            Self::Copy => capabilities.copy,
            Self::Cut => capabilities.cut,
            Self::Paste => capabilities.paste,
            Self::Formatting => capabilities.formatting,
            Self::Url => input.has(EntityKind::WebUrl),
            Self::Email => input.has(EntityKind::Email),
            Self::Path => input.has(EntityKind::Path),
            Self::Html => input.html.is_some(),
            Self::Rtf => input.rtf.is_some(),
            Self::Markdown => input.markdown.is_some(),
            Self::Option { key, value } => option_matches(options.get(key), value),
        }
    }
}

/// Compares a current option value against the textual value of a token.
fn option_matches(current: Option<&Value>, expected: &str) -> bool {
    match current {
        Some(Value::Bool(flag)) => matches!(
            (*flag, expected),
            (true, "1" | "true") | (false, "0" | "false")
        ),
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Null) | None => expected.is_empty(),
        Some(_) => false,
    }
}

/// A requirement plus its optional negation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequirementToken {
    pub requirement: Requirement,
    pub negated: bool,
}

impl RequirementToken {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            negated: false,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn holds(&self, input: &ClassifiedInput, context: &Context, options: &OptionValues) -> bool {
        self.requirement.holds(input, context, options) != self.negated
    }

    /// Parses a list of tokens, failing on the first unknown one.
    pub fn list<I, S>(tokens: I) -> Result<Vec<Self>, ActionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens.into_iter().map(|t| t.as_ref().parse()).collect()
    }
}

impl FromStr for RequirementToken {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (negated, name) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let requirement = match name {
            "text" => Requirement::Text,
            "copy" => Requirement::Copy,
            "cut" => Requirement::Cut,
            "paste" => Requirement::Paste,
            "formatting" => Requirement::Formatting,
            "url" | "urls" => Requirement::Url,
            "email" | "emails" => Requirement::Email,
            "path" => Requirement::Path,
            "html" => Requirement::Html,
            "rtf" => Requirement::Rtf,
            "markdown" => Requirement::Markdown,
            _ => {
                let (key, value) = name
                    .strip_prefix(OPTION_PREFIX)
                    .and_then(|rest| rest.split_once('='))
                    .filter(|(key, _)| !key.is_empty())
                    .ok_or_else(|| ActionError::UnknownRequirement(s.to_string()))?;
                Requirement::Option {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
        };

        Ok(Self {
            requirement,
            negated,
        })
    }
}

impl TryFrom<String> for RequirementToken {
    type Error = ActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequirementToken> for String {
    fn from(token: RequirementToken) -> Self {
        token.to_string()
    }
}

impl fmt::Display for RequirementToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        let name = match &self.requirement {
            Requirement::Text => "text",
            Requirement::Copy => "copy",
            Requirement::Cut => "cut",
            Requirement::Paste => "paste",
            Requirement::Formatting => "formatting",
            Requirement::Url => "url",
            Requirement::Email => "email",
            Requirement::Path => "path",
            Requirement::Html => "html",
            Requirement::Rtf => "rtf",
            Requirement::Markdown => "markdown",
            Requirement::Option { key, value } => {
                return write!(f, "{}{}={}", OPTION_PREFIX, key, value);
            }
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capabilities;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn token(s: &str) -> RequirementToken {
        s.parse().unwrap()
    }

    #[rstest]
    #[case::plain("text", Requirement::Text, false)]
    #[case::plural_alias("urls", Requirement::Url, false)]
    #[case::negated("!paste", Requirement::Paste, true)]
    #[case::padded(" email ", Requirement::Email, false)]
    #[case::option(
        "option-mode=fast",
        Requirement::Option { key: "mode".into(), value: "fast".into() },
        false
    )]
    #[case::negated_option(
        "!option-flag=1",
        Requirement::Option { key: "flag".into(), value: "1".into() },
        true
    )]
    fn parses_tokens(#[case] input: &str, #[case] requirement: Requirement, #[case] negated: bool) {
        assert_eq!(
            token(input),
            RequirementToken {
                requirement,
                negated
            }
        );
    }

    #[rstest]
    #[case::unknown("clipboard")]
    #[case::empty("")]
    #[case::bare_negation("!")]
    #[case::option_without_value("option-mode")]
    #[case::option_without_key("option-=x")]
    fn rejects_unknown_tokens(#[case] input: &str) {
        let err = input.parse::<RequirementToken>().unwrap_err();
        assert!(matches!(err, ActionError::UnknownRequirement(ref t) if t == input));
    }

    #[test]
    fn serde_uses_token_strings() {
        let tokens: Vec<RequirementToken> =
            serde_json::from_value(json!(["url", "!option-x=1"])).unwrap();
        assert_eq!(serde_json::to_value(&tokens).unwrap(), json!(["url", "!option-x=1"]));

        let err = serde_json::from_value::<Vec<RequirementToken>>(json!(["bogus"]));
        assert!(err.is_err());
    }

    #[test]
    fn negation_inverts() {
        let input = ClassifiedInput::new("x");
        let paste = Context::default().with_capabilities(Capabilities {
            paste: true,
            ..Capabilities::default()
        });
        let options = OptionValues::new();

        assert!(token("paste").holds(&input, &paste, &options));
        assert!(!token("!paste").holds(&input, &paste, &options));
        assert!(token("!paste").holds(&input, &Context::default(), &options));
    }

    #[test]
    fn entity_requirements_need_detected_entities() {
        let context = Context::default();
        let options = OptionValues::new();
        let plain = ClassifiedInput::new("see https://example.com");
        let detected = plain
            .clone()
            .with_entity(EntityKind::WebUrl, "https://example.com", 4..23);
        let other = plain.clone().with_entity(EntityKind::OtherUrl, "ftp://x", 0..7);

        assert!(!token("url").holds(&plain, &context, &options));
        assert!(token("url").holds(&detected, &context, &options));
        assert!(!token("url").holds(&other, &context, &options));
    }

    #[test]
    fn empty_text_fails_text_requirement() {
        let options = OptionValues::new();
        assert!(!token("text").holds(&ClassifiedInput::new(""), &Context::default(), &options));
    }

    #[rstest]
    #[case::bool_true_as_one(json!(true), "1", true)]
    #[case::bool_true_as_word(json!(true), "true", true)]
    #[case::bool_false_as_zero(json!(false), "0", true)]
    #[case::bool_mismatch(json!(false), "1", false)]
    #[case::string(json!("fast"), "fast", true)]
    #[case::string_mismatch(json!("slow"), "fast", false)]
    #[case::number(json!(3), "3", true)]
    fn option_values_compare(#[case] current: Value, #[case] expected: &str, #[case] holds: bool) {
        let mut options = OptionValues::new();
        options.insert("k".to_string(), current);
        let req = token(&format!("option-k={}", expected));

        assert_eq!(
            req.holds(&ClassifiedInput::new("x"), &Context::default(), &options),
            holds
        );
    }

    #[test]
    fn missing_option_only_matches_empty_value() {
        let options = OptionValues::new();
        let input = ClassifiedInput::new("x");
        let context = Context::default();

        assert!(token("option-k=").holds(&input, &context, &options));
        assert!(!token("option-k=1").holds(&input, &context, &options));
    }
}
