//! Module error types.

use thiserror::Error;

use crate::ModuleId;

/// Errors that can occur while resolving or loading a module.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// No file matched the reference in any search root.
    #[error("Cannot resolve module '{reference}' from {issuer}")]
    Resolution { reference: String, issuer: String },

    /// A module required itself while it was still loading.
    #[error("Cyclic module load: {}", format_chain(.chain))]
    CyclicLoad { id: ModuleId, chain: Vec<ModuleId> },

    /// The module's code faulted during evaluation.
    #[error("Failed to evaluate module {id}: {message}")]
    Evaluation { id: ModuleId, message: String },

    /// The resolved file could not be read.
    #[error("Failed to read module {id}: {source}")]
    Io {
        id: ModuleId,
        #[source]
        source: std::io::Error,
    },
}

impl ModuleError {
    /// Creates a resolution error.
    pub fn resolution(reference: impl Into<String>, issuer: Option<&ModuleId>) -> Self {
        Self::Resolution {
            reference: reference.into(),
            issuer: issuer
                .map(ToString::to_string)
                .unwrap_or_else(|| "the package root".to_string()),
        }
    }

    /// Creates a cyclic load error.
    pub fn cyclic(id: &ModuleId, chain: Vec<ModuleId>) -> Self {
        Self::CyclicLoad {
            id: id.clone(),
            chain,
        }
    }

    /// Creates an evaluation error.
    pub fn evaluation(id: &ModuleId, message: impl Into<String>) -> Self {
        Self::Evaluation {
            id: id.clone(),
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(id: &ModuleId, source: std::io::Error) -> Self {
        Self::Io {
            id: id.clone(),
            source,
        }
    }

    /// Returns the module identity this error is about, if any.
    pub fn module_id(&self) -> Option<&ModuleId> {
        match self {
            Self::Resolution { .. } => None,
            Self::CyclicLoad { id, .. } | Self::Evaluation { id, .. } | Self::Io { id, .. } => {
                Some(id)
            }
        }
    }
}

fn format_chain(chain: &[ModuleId]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
