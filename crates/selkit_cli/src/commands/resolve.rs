//! Resolve command implementation

use std::path::Path;
use std::sync::Arc;

use miette::Result;
use selkit_module::{FsSource, ModuleError, ModuleId, ModuleResolver};
use tracing::warn;

use crate::cli::Cli;

pub fn run_resolve(
    cli: &Cli,
    reference: &str,
    package: &Path,
    from: Option<&Path>,
    repository: Option<&Path>,
) -> Result<bool> {
    let mut resolver = ModuleResolver::new(super::absolute(package)?, Arc::new(FsSource));

    let repository = match repository {
        Some(dir) => Some(super::absolute(dir)?),
        None => super::load_config(cli)?.module_repository(),
    };
    if let Some(dir) = repository {
        resolver = resolver.with_repository(dir);
    }

    let issuer = from.map(super::absolute).transpose()?.map(ModuleId::new);

    match resolver.resolve(reference, issuer.as_ref()) {
        Ok(id) => {
            println!("{}", id);
            Ok(true)
        }
        Err(e @ ModuleError::Resolution { .. }) => {
            warn!("{}", e);
            Ok(false)
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
