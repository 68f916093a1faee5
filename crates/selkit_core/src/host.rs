//! The extension host.
//!
//! Discovers extensions on disk, gives each one a module loader over a
//! process-wide shared cache, and resolves actions across all of them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use selkit_action::{
    ActionDeclaration, ActionOutcome, ActionResolver, ActionSet, ClassifiedInput, Context,
    OptionValues, ResolvedAction,
};
use selkit_module::{
    Exports, FsSource, ModuleCache, ModuleId, ModuleLoader, ModuleResolver, ModuleScope,
    ScriptEngine, ScriptError, SourceProvider, Transpiler,
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{Extension, ExtensionManifest, HostConfig, HostError, MANIFEST_FILE, OptionDefinition};

/// Engine used when no script runtime is attached.
///
/// JSON modules still load; script modules fail to evaluate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOnlyEngine;

impl ScriptEngine for JsonOnlyEngine {
    fn evaluate(
        &self,
        _id: &ModuleId,
        _source: &str,
        _scope: &mut ModuleScope<'_>,
    ) -> Result<(), ScriptError> {
        Err(ScriptError::fault("No script engine attached to the host"))
    }
}

/// Hosts a set of extensions.
pub struct ExtensionHost {
    config: HostConfig,
    engine: Arc<dyn ScriptEngine>,
    transpiler: Option<Arc<dyn Transpiler>>,
    source: Arc<dyn SourceProvider>,
    cache: Arc<ModuleCache>,
    extensions: Vec<Extension>,
}

impl ExtensionHost {
    /// Creates a host with no extensions loaded yet.
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            engine: Arc::new(JsonOnlyEngine),
            transpiler: None,
            source: Arc::new(FsSource),
            cache: Arc::new(ModuleCache::new()),
            extensions: Vec::new(),
        }
    }

    /// Attaches a script engine for extensions loaded afterwards.
    pub fn with_engine(mut self, engine: Arc<dyn ScriptEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_transpiler(mut self, transpiler: Arc<dyn Transpiler>) -> Self {
        self.transpiler = Some(transpiler);
        self
    }

    /// Reads module sources through `source` instead of the file system.
    pub fn with_source(mut self, source: Arc<dyn SourceProvider>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The module cache shared by every extension.
    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn extension(&self, identifier: &str) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|ext| ext.identifier() == identifier)
    }

    /// Loads every extension found in the configured extensions directory.
    ///
    /// Extensions whose manifest cannot be loaded are skipped with a warning.
    /// Returns the number of extensions added.
    pub fn scan(&mut self) -> Result<usize, HostError> {
        let Some(dir) = self.config.extensions_dir() else {
            warn!("No extensions directory available");
            return Ok(0);
        };
        if !dir.is_dir() {
            debug!("Extensions directory {} does not exist", dir.display());
            return Ok(0);
        }

        info!("Scanning extensions in {}", dir.display());
        let manifests: Vec<PathBuf> = WalkDir::new(&dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to read extensions directory entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE)
            .map(|entry| entry.into_path())
            .collect();

        let mut added = 0;
        for manifest in manifests {
            let Some(root) = manifest.parent() else {
                continue;
            };
            match self.load_extension(root) {
                Ok(Some(_)) => added += 1,
                Ok(None) => {}
                Err(e) => warn!("Skipping extension at {}: {}", root.display(), e),
            }
        }

        info!("Loaded {} extension(s)", added);
        Ok(added)
    }

    /// Loads the extension in `root`.
    ///
    /// Returns `None` when the extension is disabled or already loaded.
    pub fn load_extension(&mut self, root: &Path) -> Result<Option<&Extension>, HostError> {
        let manifest = ExtensionManifest::from_file(&root.join(MANIFEST_FILE))?;
        let identifier = manifest.identifier.clone();

        if self.config.is_disabled(&identifier) {
            info!("Extension '{}' is disabled", identifier);
            return Ok(None);
        }
        if self.extension(&identifier).is_some() {
            warn!(
                "Extension '{}' already loaded; ignoring {}",
                identifier,
                root.display()
            );
            return Ok(None);
        }

        let loader = self.loader_for(root);
        let extra = match &manifest.module {
            Some(module) => module_declarations(&loader, module, &identifier)?,
            None => Vec::new(),
        };
        let options = manifest.option_values(self.config.user_options(&identifier));
        let set = manifest.action_set(extra);

        debug!(
            "Loaded extension '{}' with {} action(s)",
            identifier,
            set.declarations().len()
        );
        self.extensions.push(Extension::new(
            root.to_path_buf(),
            set,
            manifest.options,
            options,
            loader,
        ));
        Ok(self.extensions.last())
    }

    /// Registers an extension defined in code.
    ///
    /// User option values for the extension's identifier are applied as-is.
    pub fn register(
        &mut self,
        set: ActionSet,
        root: impl Into<PathBuf>,
        option_definitions: Vec<OptionDefinition>,
    ) -> Result<&Extension, HostError> {
        if self.extension(&set.identifier).is_some() {
            return Err(HostError::config(format!(
                "Extension '{}' is already registered",
                set.identifier
            )));
        }

        let root = root.into();
        let mut options: OptionValues = option_definitions
            .iter()
            .map(|d| (d.identifier.clone(), d.effective_default()))
            .collect();
        if let Some(user) = self.config.user_options(&set.identifier) {
            options.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let loader = self.loader_for(&root);
        self.extensions.push(Extension::new(
            root,
            set,
            option_definitions,
            options,
            loader,
        ));
        self.extensions
            .last()
            .ok_or_else(|| HostError::config("Extension registration failed"))
    }

    /// Resolves the actions offered by every extension, in load order.
    pub fn resolve_actions(&self, input: &ClassifiedInput, context: &Context) -> Vec<ResolvedAction> {
        ActionResolver::resolve_all(
            self.extensions
                .iter()
                .map(|ext| (ext.action_set(), ext.options())),
            input,
            context,
        )
    }

    /// Resolves then invokes one action.
    pub fn run(
        &self,
        extension: &str,
        action: &str,
        input: &ClassifiedInput,
        context: &Context,
    ) -> Result<ActionOutcome, HostError> {
        let ext = self
            .extension(extension)
            .ok_or_else(|| HostError::UnknownExtension(extension.to_string()))?;

        let resolved = ActionResolver::resolve(ext.action_set(), input, context, ext.options())?;
        let Some(chosen) = resolved.iter().find(|a| a.identifier() == action) else {
            let declared = ext
                .action_set()
                .declarations()
                .iter()
                .any(|d| d.identifier == action);
            return Err(if declared {
                HostError::not_offered(extension, action)
            } else {
                HostError::unknown_action(extension, action)
            });
        };

        Ok(chosen.invoke(context, ext.options())?)
    }

    /// Loads a module from an extension's package.
    pub fn require(&self, extension: &str, reference: &str) -> Result<Exports, HostError> {
        self.extension(extension)
            .ok_or_else(|| HostError::UnknownExtension(extension.to_string()))?
            .require(reference)
    }

    fn loader_for(&self, root: &Path) -> ModuleLoader {
        let mut resolver = ModuleResolver::new(root, Arc::clone(&self.source));
        if let Some(repository) = self.config.module_repository() {
            resolver = resolver.with_repository(repository);
        }

        let loader = ModuleLoader::new(resolver, Arc::clone(&self.engine))
            .with_cache(Arc::clone(&self.cache));
        match &self.transpiler {
            Some(transpiler) => loader.with_transpiler(Arc::clone(transpiler)),
            None => loader,
        }
    }
}

/// Reads the `actions` array exported by an extension's entry module.
fn module_declarations(
    loader: &ModuleLoader,
    module: &str,
    identifier: &str,
) -> Result<Vec<ActionDeclaration>, HostError> {
    let exports = loader.require(module, None)?;
    let Some(actions) = exports.get("actions") else {
        debug!("Module '{}' of '{}' exports no actions", module, identifier);
        return Ok(Vec::new());
    };

    serde_json::from_value(actions.clone()).map_err(|e| {
        HostError::manifest(
            loader.resolver().package_root().join(MANIFEST_FILE),
            format!("Invalid actions exported by '{}': {}", module, e),
        )
    })
}

impl std::fmt::Debug for ExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHost")
            .field("config", &self.config)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
