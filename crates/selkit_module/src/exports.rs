//! Export-convention detection.
//!
//! A module can hand its value to importers in several ways. After evaluation
//! the loader classifies what happened into an [`ExportConvention`] and
//! resolves it to a single value with one precedence rule.

use std::sync::Arc;

use serde_json::{Map, Value};

/// A module's exported value, shared by every importer.
///
/// Importers receive clones of the same `Arc`, so `Arc::ptr_eq` holds between
/// any two loads of one module.
pub type Exports = Arc<Value>;

/// Property of the exports container that marks a single primary export.
pub const PRIMARY_EXPORT: &str = "default";

/// How an evaluated module communicated its exported value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportConvention {
    /// The factory-registration hook was invoked; holds its resolved object.
    Factory(Value),
    /// The exports container was replaced with a new value.
    Container(Value),
    /// The container carries a primary-export property; holds its value.
    DefaultProperty(Value),
    /// The container as accumulated by property assignments.
    RawContainer(Map<String, Value>),
}

impl ExportConvention {
    /// Classifies the end state of a module scope.
    ///
    /// Precedence: factory registration, then container replacement, then the
    /// primary-export property, then the raw container.
    pub fn detect(
        defined: Option<Value>,
        replaced: Option<Value>,
        mut container: Map<String, Value>,
    ) -> Self {
        if let Some(value) = defined {
            return Self::Factory(value);
        }
        if let Some(value) = replaced {
            return Self::Container(value);
        }
        match container.remove(PRIMARY_EXPORT) {
            Some(value) => Self::DefaultProperty(value),
            None => Self::RawContainer(container),
        }
    }

    /// Returns the normalized export value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Factory(value) | Self::Container(value) | Self::DefaultProperty(value) => value,
            Self::RawContainer(map) => Value::Object(map),
        }
    }

    /// Short name of the convention, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Factory(_) => "factory",
            Self::Container(_) => "container",
            Self::DefaultProperty(_) => "default-property",
            Self::RawContainer(_) => "raw-container",
        }
    }
}
