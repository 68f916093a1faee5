//! Host error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while hosting extensions.
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An extension manifest could not be loaded.
    #[error("Invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// No extension with this identifier is loaded.
    #[error("Unknown extension '{0}'")]
    UnknownExtension(String),

    /// The extension declares no such action.
    #[error("Extension '{extension}' has no action '{action}'")]
    UnknownAction { extension: String, action: String },

    /// The action exists but is not offered for the current input.
    #[error("Action '{action}' of extension '{extension}' does not apply to this input")]
    NotOffered { extension: String, action: String },

    /// Module error.
    #[error(transparent)]
    Module(#[from] selkit_module::ModuleError),

    /// Action error.
    #[error(transparent)]
    Action(#[from] selkit_action::ActionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unknown_action(extension: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            extension: extension.into(),
            action: action.into(),
        }
    }

    pub fn not_offered(extension: impl Into<String>, action: impl Into<String>) -> Self {
        Self::NotOffered {
            extension: extension.into(),
            action: action.into(),
        }
    }

    /// Whether the error means "nothing found" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownExtension(_)
                | Self::UnknownAction { .. }
                | Self::NotOffered { .. }
                | Self::Module(selkit_module::ModuleError::Resolution { .. })
        )
    }
}
