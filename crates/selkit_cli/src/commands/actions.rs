//! Actions command implementation

use miette::Result;
use selkit_action::{Context, InputClassifier};
use selkit_core::BasicClassifier;

use crate::cli::{Cli, OutputFormat};
use crate::output::output_actions;

pub fn run_actions(cli: &Cli, text: &str, context: &Context, format: OutputFormat) -> Result<bool> {
    let host = super::load_host(cli)?;
    let input = BasicClassifier::new().classify(text, context);
    let actions = host.resolve_actions(&input, context);

    output_actions(&actions, format)?;
    Ok(!actions.is_empty())
}
