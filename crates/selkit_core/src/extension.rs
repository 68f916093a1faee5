//! A loaded extension.

use std::path::{Path, PathBuf};

use selkit_action::{ActionSet, OptionValues};
use selkit_module::{Exports, ModuleLoader};

use crate::{HostError, OptionDefinition};

/// One extension known to the host: its actions, current option values and
/// the loader for modules inside its package.
#[derive(Debug)]
pub struct Extension {
    root: PathBuf,
    set: ActionSet,
    option_definitions: Vec<OptionDefinition>,
    options: OptionValues,
    loader: ModuleLoader,
}

impl Extension {
    pub(crate) fn new(
        root: PathBuf,
        set: ActionSet,
        option_definitions: Vec<OptionDefinition>,
        options: OptionValues,
        loader: ModuleLoader,
    ) -> Self {
        Self {
            root,
            set,
            option_definitions,
            options,
            loader,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.set.identifier
    }

    pub fn name(&self) -> &str {
        &self.set.name
    }

    /// The extension's package root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn action_set(&self) -> &ActionSet {
        &self.set
    }

    pub fn option_definitions(&self) -> &[OptionDefinition] {
        &self.option_definitions
    }

    /// Current option values: defaults overlaid with user settings.
    pub fn options(&self) -> &OptionValues {
        &self.options
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    /// Loads a module from the extension's package.
    pub fn require(&self, reference: &str) -> Result<Exports, HostError> {
        Ok(self.loader.require(reference, None)?)
    }
}
