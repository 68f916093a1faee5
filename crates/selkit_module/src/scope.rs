//! The scope a module's code is evaluated in.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{ExportConvention, Exports, ModuleId, ModuleLoader, ScriptError};

/// A call to the factory-registration hook.
///
/// Every form is resolved to a single value synchronously inside
/// [`ModuleScope::define`].
pub enum Definition<'f> {
    /// A plain object passed directly.
    Object(Value),
    /// A zero-argument factory.
    Factory(Box<dyn FnOnce() -> Result<Value, ScriptError> + 'f>),
    /// A factory receiving the exports of its declared dependencies.
    Dependent {
        /// Optional module name given by the definition. Informational only.
        name: Option<String>,
        /// References resolved relative to the defining module.
        dependencies: Vec<String>,
        factory: Box<dyn FnOnce(Vec<Exports>) -> Result<Value, ScriptError> + 'f>,
    },
}

impl<'f> Definition<'f> {
    /// Defines the module as a plain object.
    pub fn object(value: Value) -> Self {
        Self::Object(value)
    }

    /// Defines the module through a zero-argument factory.
    pub fn factory(factory: impl FnOnce() -> Result<Value, ScriptError> + 'f) -> Self {
        Self::Factory(Box::new(factory))
    }

    /// Defines the module through a factory with dependencies.
    pub fn dependent<S: Into<String>>(
        name: Option<&str>,
        dependencies: impl IntoIterator<Item = S>,
        factory: impl FnOnce(Vec<Exports>) -> Result<Value, ScriptError> + 'f,
    ) -> Self {
        Self::Dependent {
            name: name.map(str::to_string),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            factory: Box::new(factory),
        }
    }
}

/// Bindings visible to evaluated module code.
///
/// The exports container starts as an empty object. Property writes go to
/// that original object even after it has been replaced, mirroring how an
/// `exports` alias keeps pointing at the seeded container.
pub struct ModuleScope<'a> {
    id: &'a ModuleId,
    loader: &'a ModuleLoader,
    exports: Map<String, Value>,
    replaced: Option<Value>,
    defined: Option<Value>,
}

impl<'a> ModuleScope<'a> {
    pub(crate) fn new(id: &'a ModuleId, loader: &'a ModuleLoader) -> Self {
        Self {
            id,
            loader,
            exports: Map::new(),
            replaced: None,
            defined: None,
        }
    }

    /// Identity of the module being evaluated.
    pub fn id(&self) -> &ModuleId {
        self.id
    }

    /// The seeded exports container.
    pub fn exports(&self) -> &Map<String, Value> {
        &self.exports
    }

    /// Mutable access to the seeded exports container.
    pub fn exports_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.exports
    }

    /// Assigns one property of the exports container.
    pub fn set_export(&mut self, key: impl Into<String>, value: Value) {
        self.exports.insert(key.into(), value);
    }

    /// Replaces the exports container with a new value.
    pub fn replace_exports(&mut self, value: Value) {
        self.replaced = Some(value);
    }

    /// The factory-registration hook.
    ///
    /// Invoking it again discards the earlier registration.
    pub fn define(&mut self, definition: Definition<'_>) -> Result<(), ScriptError> {
        let value = match definition {
            Definition::Object(value) => value,
            Definition::Factory(factory) => factory()?,
            Definition::Dependent {
                name,
                dependencies,
                factory,
            } => {
                if let Some(name) = &name {
                    debug!("Module {} defines itself as '{}'", self.id, name);
                }
                let resolved = dependencies
                    .iter()
                    .map(|reference| self.loader.require(reference, Some(self.id)))
                    .collect::<Result<Vec<_>, _>>()?;
                factory(resolved)?
            }
        };

        if self.defined.is_some() {
            debug!(
                "Module {} invoked the definition hook again; keeping the latest",
                self.id
            );
        }
        self.defined = Some(value);
        Ok(())
    }

    pub(crate) fn into_convention(self) -> ExportConvention {
        ExportConvention::detect(self.defined, self.replaced, self.exports)
    }
}
