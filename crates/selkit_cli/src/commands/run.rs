//! Run command implementation

use miette::Result;
use selkit_action::{Context, InputClassifier};
use selkit_core::BasicClassifier;
use tracing::warn;

use crate::cli::{Cli, OutputFormat};
use crate::output::output_outcome;

pub fn run_action(
    cli: &Cli,
    extension: &str,
    action: &str,
    text: &str,
    context: &Context,
    format: OutputFormat,
) -> Result<bool> {
    let host = super::load_host(cli)?;
    let input = BasicClassifier::new().classify(text, context);

    match host.run(extension, action, &input, context) {
        Ok(outcome) => {
            output_outcome(&outcome, format)?;
            Ok(true)
        }
        Err(e) if e.is_not_found() => {
            warn!("{}", e);
            Ok(false)
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
