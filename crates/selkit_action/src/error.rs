//! Action error types.

use thiserror::Error;

/// Errors that can occur while resolving or invoking actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The extension's population callback faulted.
    #[error("Population callback of extension '{extension}' failed: {message}")]
    Population { extension: String, message: String },

    /// A requirement token is not recognized.
    #[error("Unknown requirement '{0}'")]
    UnknownRequirement(String),

    /// The action has no executable code.
    #[error("Action '{action}' of extension '{extension}' is disabled")]
    Disabled { extension: String, action: String },

    /// The action's code faulted.
    #[error("Action '{action}' of extension '{extension}' failed: {message}")]
    Fault {
        extension: String,
        action: String,
        message: String,
    },
}

impl ActionError {
    /// Creates a population error.
    pub fn population(extension: impl Into<String>, message: impl ToString) -> Self {
        Self::Population {
            extension: extension.into(),
            message: message.to_string(),
        }
    }

    /// Creates a disabled-action error.
    pub fn disabled(extension: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Disabled {
            extension: extension.into(),
            action: action.into(),
        }
    }

    /// Creates an action fault.
    pub fn fault(
        extension: impl Into<String>,
        action: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::Fault {
            extension: extension.into(),
            action: action.into(),
            message: message.to_string(),
        }
    }
}

/// A pattern that cannot be compiled.
///
/// The affected action is treated as not matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

impl PatternError {
    /// Creates a pattern error.
    pub fn new(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
