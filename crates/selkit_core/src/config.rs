//! Host configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use selkit_action::OptionValues;
use serde::{Deserialize, Serialize};

use crate::HostError;

/// Configuration file names looked up in a directory, in order.
pub const CONFIG_FILES: &[&str] = &["selkit.jsonc", "selkit.json"];

/// Configuration for the extension host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory holding one subdirectory per extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_dir: Option<PathBuf>,

    /// Shared module repository searched after each package root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_repository: Option<PathBuf>,

    /// Extension identifiers to skip when scanning.
    pub disabled: Vec<String>,

    /// User option values, keyed by extension identifier.
    pub options: BTreeMap<String, OptionValues>,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.jsonc` and `.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HostError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| HostError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_default();

        if value.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(value).map_err(|e| HostError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the first configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Resolves `path` against [`base_dir`](Self::base_dir) when relative.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Effective extensions directory.
    ///
    /// Falls back to `<data dir>/selkit/extensions`.
    pub fn extensions_dir(&self) -> Option<PathBuf> {
        match &self.extensions_dir {
            Some(dir) => Some(self.resolve_path(dir)),
            None => dirs::data_dir().map(|data| data.join("selkit").join("extensions")),
        }
    }

    /// Effective module repository, if configured.
    pub fn module_repository(&self) -> Option<PathBuf> {
        self.module_repository
            .as_deref()
            .map(|dir| self.resolve_path(dir))
    }

    pub fn is_disabled(&self, identifier: &str) -> bool {
        self.disabled.iter().any(|d| d == identifier)
    }

    /// User-supplied option values for one extension.
    pub fn user_options(&self, identifier: &str) -> Option<&OptionValues> {
        self.options.get(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn parses_jsonc_with_comments() {
        let config = HostConfig::from_json(
            r#"{
                // where extensions live
                "extensions_dir": "exts",
                "disabled": ["com.example.off"],
                "options": { "com.example.on": { "mode": "fast" } },
            }"#,
        )
        .unwrap();

        assert_eq!(config.extensions_dir, Some(PathBuf::from("exts")));
        assert!(config.is_disabled("com.example.off"));
        assert!(!config.is_disabled("com.example.on"));
        assert_eq!(
            config.user_options("com.example.on").and_then(|o| o.get("mode")),
            Some(&json!("fast"))
        );
    }

    #[test]
    fn empty_document_is_default() {
        let config = HostConfig::from_json("").unwrap();
        assert!(config.disabled.is_empty());
        assert!(config.extensions_dir.is_none());
    }

    #[test]
    fn rejects_wrong_types() {
        let err = HostConfig::from_json(r#"{"disabled": "nope"}"#).unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selkit.json");
        fs::write(
            &path,
            r#"{"extensions_dir": "exts", "module_repository": "/opt/modules"}"#,
        )
        .unwrap();

        let config = HostConfig::from_file(&path).unwrap();

        assert_eq!(config.extensions_dir(), Some(dir.path().join("exts")));
        assert_eq!(config.module_repository(), Some(PathBuf::from("/opt/modules")));
    }

    #[test]
    fn discover_prefers_jsonc() {
        let dir = tempdir().unwrap();
        assert_eq!(HostConfig::discover(dir.path()), None);

        fs::write(dir.path().join("selkit.json"), "{}").unwrap();
        fs::write(dir.path().join("selkit.jsonc"), "{}").unwrap();

        assert_eq!(
            HostConfig::discover(dir.path()),
            Some(dir.path().join("selkit.jsonc"))
        );
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = HostConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }
}
