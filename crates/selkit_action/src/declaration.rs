//! Action declarations and the sets extensions publish them in.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ClassifiedInput, Context, Pattern, PopulateFn, RequirementToken};

/// Current option values of one extension, keyed by option identifier.
pub type OptionValues = BTreeMap<String, Value>;

/// Result type for extension-supplied callbacks.
pub type CodeResult<T> = Result<T, Box<dyn StdError + Send + Sync>>;

/// Marker in a URL template replaced by the matched text.
const URL_PLACEHOLDER: &str = "***";

/// What an action asks the host to do once it has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ActionOutcome {
    Nothing,
    Paste(String),
    Copy(String),
    OpenUrl(String),
}

/// Arguments handed to action code.
#[derive(Debug, Clone, Copy)]
pub struct ActionInvocation<'a> {
    /// The input, with `matched` set when the action declared a pattern.
    pub input: &'a ClassifiedInput,
    pub options: &'a OptionValues,
    pub context: &'a Context,
}

type CodeFn = dyn Fn(&ActionInvocation<'_>) -> CodeResult<ActionOutcome> + Send + Sync;

/// Executable body of an action.
#[derive(Clone)]
pub struct ActionCode(Arc<CodeFn>);

impl ActionCode {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ActionInvocation<'_>) -> CodeResult<ActionOutcome> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Code that opens `template` with `***` replaced by the form-encoded
    /// matched text.
    pub fn url_template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::new(move |invocation| {
            let text = invocation
                .input
                .matched
                .as_ref()
                .map_or(invocation.input.text.as_str(), |m| m.full.as_str());
            let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
            Ok(ActionOutcome::OpenUrl(
                template.replace(URL_PLACEHOLDER, &encoded),
            ))
        })
    }

    pub fn call(&self, invocation: &ActionInvocation<'_>) -> CodeResult<ActionOutcome> {
        (self.0)(invocation)
    }
}

impl fmt::Debug for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionCode(..)")
    }
}

/// Declarative description of one action.
///
/// Unset filters fall back to the owning [`ActionSet`]; an action without
/// code (and without a URL template) is offered but disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDeclaration {
    pub identifier: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<RequirementToken>>,

    #[serde(default, rename = "regex", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_apps: Option<Vec<String>>,

    /// URL template opened with the matched text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip)]
    pub code: Option<ActionCode>,
}

impl ActionDeclaration {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<RequirementToken>) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_apps<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apps = Some(apps.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_excluded_apps<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_apps = Some(apps.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url = Some(template.into());
        self
    }

    pub fn with_code(mut self, code: ActionCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Code run on invocation: explicit code first, then the URL template.
    pub fn effective_code(&self) -> Option<ActionCode> {
        self.code
            .clone()
            .or_else(|| self.url.as_ref().map(ActionCode::url_template))
    }

    pub fn is_enabled(&self) -> bool {
        self.code.is_some() || self.url.is_some()
    }
}

/// Where the actions of a set come from.
#[derive(Debug, Clone)]
pub enum ActionSource {
    /// A fixed list, filtered on every invocation.
    Static(Vec<ActionDeclaration>),
    /// A callback that computes the list for each invocation.
    Populate(PopulateFn),
}

/// Every action one extension publishes, plus extension-wide filters that
/// its static actions inherit.
#[derive(Debug, Clone)]
pub struct ActionSet {
    pub identifier: String,
    pub name: String,
    pub requirements: Option<Vec<RequirementToken>>,
    pub pattern: Option<Pattern>,
    pub apps: Option<Vec<String>>,
    pub excluded_apps: Option<Vec<String>>,
    pub source: ActionSource,
}

impl ActionSet {
    pub fn new(identifier: impl Into<String>, source: ActionSource) -> Self {
        let identifier = identifier.into();
        Self {
            name: identifier.clone(),
            identifier,
            requirements: None,
            pattern: None,
            apps: None,
            excluded_apps: None,
            source,
        }
    }

    pub fn from_actions(identifier: impl Into<String>, actions: Vec<ActionDeclaration>) -> Self {
        Self::new(identifier, ActionSource::Static(actions))
    }

    pub fn from_populate(identifier: impl Into<String>, populate: PopulateFn) -> Self {
        Self::new(identifier, ActionSource::Populate(populate))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<RequirementToken>) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_apps(mut self, apps: Vec<String>) -> Self {
        self.apps = Some(apps);
        self
    }

    pub fn with_excluded_apps(mut self, apps: Vec<String>) -> Self {
        self.excluded_apps = Some(apps);
        self
    }

    /// Static declarations; empty for populated sets.
    pub fn declarations(&self) -> &[ActionDeclaration] {
        match &self.source {
            ActionSource::Static(actions) => actions,
            ActionSource::Populate(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn invoke(code: &ActionCode, input: &ClassifiedInput) -> ActionOutcome {
        code.call(&ActionInvocation {
            input,
            options: &OptionValues::new(),
            context: &Context::default(),
        })
        .unwrap()
    }

    #[test]
    fn url_template_encodes_selection() {
        let code = ActionCode::url_template("https://example.com/search?q=***");
        let outcome = invoke(&code, &ClassifiedInput::new("rust & ownership"));

        assert_eq!(
            outcome,
            ActionOutcome::OpenUrl("https://example.com/search?q=rust+%26+ownership".to_string())
        );
    }

    #[test]
    fn url_template_prefers_matched_text() {
        let code = ActionCode::url_template("https://example.com/tags/***");
        let input = ClassifiedInput::new("see #rust").with_match(MatchRecord::new("#rust"));

        assert_eq!(
            invoke(&code, &input),
            ActionOutcome::OpenUrl("https://example.com/tags/%23rust".to_string())
        );
    }

    #[test]
    fn deserializes_manifest_entry() {
        let declaration: ActionDeclaration = serde_json::from_value(json!({
            "identifier": "tag",
            "title": "Open tag",
            "regex": "#\\w+",
            "requirements": ["text", "!paste"],
            "excludedApps": ["com.example.Editor"],
            "url": "https://example.com/***"
        }))
        .unwrap();

        assert_eq!(declaration.identifier, "tag");
        assert_eq!(declaration.requirements.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            declaration.excluded_apps,
            Some(vec!["com.example.Editor".to_string()])
        );
        assert!(declaration.pattern.is_some());
        assert!(declaration.is_enabled());
    }

    #[test]
    fn declaration_without_code_is_disabled() {
        let declaration = ActionDeclaration::new("noop", "Nothing");
        assert!(!declaration.is_enabled());
        assert!(declaration.effective_code().is_none());
    }

    #[test]
    fn outcome_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(ActionOutcome::Paste("x".to_string())).unwrap(),
            json!({"type": "paste", "value": "x"})
        );
        assert_eq!(
            serde_json::to_value(ActionOutcome::Nothing).unwrap(),
            json!({"type": "nothing"})
        );
    }
}
