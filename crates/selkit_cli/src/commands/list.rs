//! List command implementation

use miette::Result;

use crate::cli::{Cli, OutputFormat};
use crate::output::output_extensions;

pub fn run_list(cli: &Cli, format: OutputFormat) -> Result<bool> {
    let host = super::load_host(cli)?;
    output_extensions(host.extensions(), format)?;
    Ok(true)
}
