//! Command implementations

pub mod actions;
pub mod list;
pub mod resolve;
pub mod run;

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use selkit_core::{ExtensionHost, HostConfig};
use tracing::debug;

use crate::cli::Cli;

/// Loads the host configuration from `--config`, then from the working
/// directory, then falls back to defaults.
pub fn load_config(cli: &Cli) -> Result<HostConfig> {
    let mut config = if let Some(ref path) = cli.config {
        HostConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    if let Some(ref dir) = cli.extensions_dir {
        config.extensions_dir = Some(dir.clone());
    }
    Ok(config)
}

fn find_config() -> Result<HostConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    match HostConfig::discover(&cwd) {
        Some(path) => {
            debug!("Using config {}", path.display());
            HostConfig::from_file(&path).into_diagnostic()
        }
        None => Ok(HostConfig::default()),
    }
}

/// Creates a host and loads every extension.
pub fn load_host(cli: &Cli) -> Result<ExtensionHost> {
    let mut host = ExtensionHost::new(load_config(cli)?);
    host.scan().into_diagnostic()?;
    Ok(host)
}

/// Makes `path` absolute against the working directory.
pub fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir().into_diagnostic()?.join(path))
    }
}
