//! Extension manifests.
//!
//! Each extension directory holds a [`MANIFEST_FILE`] describing the
//! extension, its actions and its options. Comments and trailing commas are
//! accepted.

use std::fs;
use std::path::Path;

use jsonc_parser::ParseOptions;
use selkit_action::{ActionDeclaration, ActionSet, OptionValues, Pattern, RequirementToken};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::HostError;

/// Manifest file name inside an extension directory.
pub const MANIFEST_FILE: &str = "Config.json";

/// Type of a user-configurable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Boolean,
    /// One of a fixed list of values.
    Multiple,
    /// A string the host should store securely.
    Secret,
}

/// A user-configurable option declared by an extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDefinition {
    pub identifier: String,

    #[serde(rename = "type")]
    pub kind: OptionKind,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Allowed values for [`OptionKind::Multiple`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl OptionDefinition {
    /// Value used when the user has not set one.
    pub fn effective_default(&self) -> Value {
        if let Some(value) = &self.default_value {
            return value.clone();
        }
        match self.kind {
            OptionKind::Boolean => Value::Bool(false),
            OptionKind::Multiple => self
                .values
                .first()
                .map_or_else(|| Value::String(String::new()), |v| Value::String(v.clone())),
            OptionKind::String | OptionKind::Secret => Value::String(String::new()),
        }
    }
}

/// Parsed contents of an extension manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
    pub identifier: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Requirements inherited by actions that declare none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<RequirementToken>>,

    /// Pattern inherited by actions that declare none.
    #[serde(default, rename = "regex", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_apps: Option<Vec<String>>,

    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,

    /// Shorthand for a single action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDeclaration>,

    #[serde(default)]
    pub options: Vec<OptionDefinition>,

    /// Module whose exported `actions` array is appended to the declared
    /// actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ExtensionManifest {
    /// Loads the manifest file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let content = fs::read_to_string(path)
            .map_err(|e| HostError::manifest(path, format!("Failed to read: {}", e)))?;
        Self::from_json(&content).map_err(|message| HostError::manifest(path, message))
    }

    /// Parses a manifest from a JSON (or JSONC) string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| format!("Invalid JSON: {}", e))?
            .ok_or_else(|| "Empty manifest".to_string())?;

        let manifest: Self = serde_json::from_value(value).map_err(|e| e.to_string())?;
        if manifest.identifier.trim().is_empty() {
            return Err("Missing extension identifier".to_string());
        }
        Ok(manifest)
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.identifier
        } else {
            &self.name
        }
    }

    /// Declared actions, the single `action` last.
    pub fn declarations(&self) -> Vec<ActionDeclaration> {
        self.actions
            .iter()
            .chain(self.action.as_ref())
            .cloned()
            .collect()
    }

    /// Builds the action set, appending `extra` declarations.
    pub fn action_set(&self, extra: Vec<ActionDeclaration>) -> ActionSet {
        let mut declarations = self.declarations();
        declarations.extend(extra);

        let mut set = ActionSet::from_actions(&self.identifier, declarations)
            .with_name(self.display_name());
        set.requirements = self.requirements.clone();
        set.pattern = self.pattern.clone();
        set.apps = self.apps.clone();
        set.excluded_apps = self.excluded_apps.clone();
        set
    }

    /// Default option values overlaid with `user` values.
    ///
    /// User values for options the manifest does not declare are ignored.
    pub fn option_values(&self, user: Option<&OptionValues>) -> OptionValues {
        self.options
            .iter()
            .map(|definition| {
                let value = user
                    .and_then(|values| values.get(&definition.identifier))
                    .cloned()
                    .unwrap_or_else(|| definition.effective_default());
                (definition.identifier.clone(), value)
            })
            .collect()
    }
}
