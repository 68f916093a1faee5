//! Script engine and transpiler seams.
//!
//! The loader does not interpret code. Hosts plug in the scripting runtime
//! they embed by implementing [`ScriptEngine`], and optionally a
//! [`Transpiler`] that lowers the typed dialect to the base dialect.

use thiserror::Error;

use crate::{ModuleError, ModuleId, ModuleScope};

/// A failure raised while running module code.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The code threw or otherwise faulted.
    #[error("{0}")]
    Fault(String),

    /// A nested module load failed (e.g. a dependency of a factory).
    #[error(transparent)]
    Module(#[from] ModuleError),
}

impl ScriptError {
    /// Creates a fault with the given message.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// Converts into the loader's error for module `id`.
    ///
    /// Nested module errors keep their own identity and kind.
    pub(crate) fn into_module_error(self, id: &ModuleId) -> ModuleError {
        match self {
            Self::Fault(message) => ModuleError::evaluation(id, message),
            Self::Module(err) => err,
        }
    }
}

/// Evaluates module source in an isolated scope.
///
/// Implementations expose exactly two bindings to the evaluated code: the
/// factory-registration hook ([`ModuleScope::define`]) and the exports
/// container ([`ModuleScope::exports_mut`] / [`ModuleScope::replace_exports`]).
/// Evaluation is synchronous from the loader's point of view.
pub trait ScriptEngine: Send + Sync {
    /// Runs `source` for module `id`, writing its exports into `scope`.
    fn evaluate(
        &self,
        id: &ModuleId,
        source: &str,
        scope: &mut ModuleScope<'_>,
    ) -> Result<(), ScriptError>;
}

/// Lowers typed-dialect source to the base dialect.
pub trait Transpiler: Send + Sync {
    /// Transpiles `source` of module `id`.
    fn transpile(&self, id: &ModuleId, source: &str) -> Result<String, ScriptError>;
}

impl<F> Transpiler for F
where
    F: Fn(&ModuleId, &str) -> Result<String, ScriptError> + Send + Sync,
{
    fn transpile(&self, id: &ModuleId, source: &str) -> Result<String, ScriptError> {
        self(id, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_maps_to_evaluation_error() {
        let id = ModuleId::new("/ext/a.js");
        let err = ScriptError::fault("boom").into_module_error(&id);
        assert!(matches!(err, ModuleError::Evaluation { ref message, .. } if message == "boom"));
    }

    #[test]
    fn test_nested_module_error_is_preserved() {
        let a = ModuleId::new("/ext/a.js");
        let b = ModuleId::new("/ext/b.js");
        let nested = ModuleError::cyclic(&b, vec![b.clone(), b.clone()]);
        let err = ScriptError::from(nested).into_module_error(&a);
        assert!(matches!(err, ModuleError::CyclicLoad { ref id, .. } if *id == b));
    }

    #[test]
    fn test_closure_transpiler() {
        let transpiler = |_: &ModuleId, source: &str| -> Result<String, ScriptError> {
            Ok(source.replace(": string", ""))
        };
        let id = ModuleId::new("/ext/a.ts");
        assert_eq!(
            transpiler.transpile(&id, "let a: string").unwrap(),
            "let a"
        );
    }
}
