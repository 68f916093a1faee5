//! Environment snapshot for one invocation.

use serde::{Deserialize, Serialize};

/// What the host can do with the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub formatting: bool,
    pub paste: bool,
    pub copy: bool,
    pub cut: bool,
}

/// Modifier keys held when the action is triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub option: bool,
    pub command: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        option: false,
        command: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.control || self.option || self.command
    }
}

/// The foreground application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub name: String,
    pub bundle_identifier: String,
}

/// The page shown by a browser, when the foreground app is one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserPage {
    pub url: String,
    pub title: String,
}

/// Everything the host knows about the environment at invocation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub capabilities: Capabilities,
    pub app: Option<AppInfo>,
    pub browser: Option<BrowserPage>,
    pub modifiers: Modifiers,
}

impl Context {
    /// Bundle identifier of the foreground app, if known.
    pub fn bundle_identifier(&self) -> Option<&str> {
        self.app.as_ref().map(|app| app.bundle_identifier.as_str())
    }

    /// The same context with every modifier released.
    ///
    /// Population callbacks always see this variant: the modifiers held at
    /// selection time are not meaningful when building the action list.
    pub fn without_modifiers(&self) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            ..self.clone()
        }
    }

    pub fn with_app(mut self, name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        self.app = Some(AppInfo {
            name: name.into(),
            bundle_identifier: bundle_identifier.into(),
        });
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_browser(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.browser = Some(BrowserPage {
            url: url.into(),
            title: title.into(),
        });
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_modifiers_keeps_everything_else() {
        let context = Context::default()
            .with_app("Safari", "com.apple.Safari")
            .with_modifiers(Modifiers {
                shift: true,
                command: true,
                ..Modifiers::NONE
            });

        let quiet = context.without_modifiers();

        assert!(context.modifiers.any());
        assert!(!quiet.modifiers.any());
        assert_eq!(quiet.bundle_identifier(), Some("com.apple.Safari"));
    }

    #[test]
    fn deserializes_partial_json() {
        let context: Context =
            serde_json::from_str(r#"{"capabilities": {"paste": true}}"#).unwrap();

        assert!(context.capabilities.paste);
        assert!(!context.capabilities.cut);
        assert!(context.app.is_none());
    }
}
