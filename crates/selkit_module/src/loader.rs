//! Module loader.
//!
//! Turns a canonical identity into an exported value: reads the file,
//! transpiles typed sources, evaluates through the injected engine, detects
//! the export convention and stores the result in the shared cache.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::Claim;
use crate::{
    Exports, ModuleCache, ModuleError, ModuleId, ModuleKind, ModuleResolver, ModuleScope,
    ScriptEngine, Transpiler,
};

/// Loads and caches modules for one extension package.
///
/// Several loaders may share one [`ModuleCache`]; identities are absolute
/// paths, so entries never collide across packages.
pub struct ModuleLoader {
    resolver: ModuleResolver,
    engine: Arc<dyn ScriptEngine>,
    transpiler: Option<Arc<dyn Transpiler>>,
    cache: Arc<ModuleCache>,
}

impl ModuleLoader {
    /// Creates a loader with its own empty cache.
    pub fn new(resolver: ModuleResolver, engine: Arc<dyn ScriptEngine>) -> Self {
        Self {
            resolver,
            engine,
            transpiler: None,
            cache: Arc::new(ModuleCache::new()),
        }
    }

    /// Uses `transpiler` for typed-dialect modules.
    pub fn with_transpiler(mut self, transpiler: Arc<dyn Transpiler>) -> Self {
        self.transpiler = Some(transpiler);
        self
    }

    /// Shares an existing cache.
    pub fn with_cache(mut self, cache: Arc<ModuleCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The resolver used by [`ModuleLoader::require`].
    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// The cache backing this loader.
    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    /// Resolves `reference` from `issuer` and loads the result.
    ///
    /// Without an issuer, relative references start at the package root.
    pub fn require(
        &self,
        reference: &str,
        issuer: Option<&ModuleId>,
    ) -> Result<Exports, ModuleError> {
        let id = self.resolver.resolve(reference, issuer)?;
        self.load(&id)
    }

    /// Loads a module by canonical identity.
    ///
    /// Each identity is evaluated at most once; every later call returns the
    /// same exports instance. Failed loads are evicted so a later call
    /// retries.
    pub fn load(&self, id: &ModuleId) -> Result<Exports, ModuleError> {
        let guard = match self.cache.claim(id)? {
            Claim::Cached(exports) => {
                debug!("Module cache hit: {}", id);
                return Ok(exports);
            }
            Claim::Owned(guard) => guard,
        };

        debug!("Loading module {}", id);
        let value = self.produce(id)?;
        Ok(guard.complete(Arc::new(value)))
    }

    fn produce(&self, id: &ModuleId) -> Result<Value, ModuleError> {
        let bytes = self
            .resolver
            .source()
            .read(id.path())
            .map_err(|e| ModuleError::io(id, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ModuleError::evaluation(id, format!("Source is not valid UTF-8: {}", e)))?;

        match id.kind() {
            ModuleKind::Json => serde_json::from_str(&text)
                .map_err(|e| ModuleError::evaluation(id, format!("Invalid JSON: {}", e))),
            ModuleKind::TypedScript => {
                let transpiler = self.transpiler.as_ref().ok_or_else(|| {
                    ModuleError::evaluation(id, "No transpiler configured for typed modules")
                })?;
                let lowered = transpiler
                    .transpile(id, &text)
                    .map_err(|e| e.into_module_error(id))?;
                self.evaluate(id, &lowered)
            }
            ModuleKind::Script => self.evaluate(id, &text),
        }
    }

    fn evaluate(&self, id: &ModuleId, source: &str) -> Result<Value, ModuleError> {
        let mut scope = ModuleScope::new(id, self);
        self.engine
            .evaluate(id, source, &mut scope)
            .map_err(|e| e.into_module_error(id))?;

        let convention = scope.into_convention();
        debug!("Module {} exported via {} convention", id, convention.name());
        Ok(convention.into_value())
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("package_root", &self.resolver.package_root())
            .field("repository_root", &self.resolver.repository_root())
            .field("transpiler", &self.transpiler.is_some())
            .field("cached_modules", &self.cache.len())
            .finish()
    }
}
